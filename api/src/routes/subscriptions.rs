use crate::handlers::RequestHandler;
use crate::routes::{into_api_request, into_http_response};
use crate::startup::SignupHandler;
use actix_web::{web, HttpRequest, HttpResponse};

pub async fn subscribe(
    request: HttpRequest,
    body: web::Bytes,
    handler: web::Data<SignupHandler>,
) -> HttpResponse {
    let response = handler.handle(into_api_request(&request, body)).await;

    into_http_response(response)
}
