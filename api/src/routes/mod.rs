mod contact;
mod health_check;
mod subscriptions;

pub use contact::contact;
pub use health_check::health_check;
pub use subscriptions::subscribe;

use crate::domain::RequestMetadata;
use crate::transport::{ApiRequest, ApiResponse};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

fn into_api_request(request: &HttpRequest, body: web::Bytes) -> ApiRequest {
    // actix-web and the handlers are on different `http` major versions.
    let method = http::Method::from_bytes(request.method().as_str().as_bytes()).unwrap_or_default();

    // Bodies that are not UTF-8 cannot be JSON and are treated as absent.
    let body = if body.is_empty() {
        None
    } else {
        std::str::from_utf8(&body).ok().map(str::to_string)
    };

    let user_agent = request
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    ApiRequest {
        method,
        body,
        metadata: RequestMetadata {
            source_ip: request.peer_addr().map(|addr| addr.ip().to_string()),
            user_agent,
        },
    }
}

fn into_http_response(response: ApiResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = HttpResponse::build(status);
    for header in response.headers {
        builder.insert_header(header);
    }

    builder.body(response.body)
}
