//! API Gateway REST proxy integration.

use crate::domain::RequestMetadata;
use crate::transport::{ApiRequest, ApiResponse};
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::header::{HeaderName, HeaderValue, USER_AGENT};
use http::HeaderMap;

pub fn into_api_request(event: ApiGatewayProxyRequest) -> ApiRequest {
    let user_agent = event
        .headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(event.request_context.identity.user_agent);

    ApiRequest {
        method: event.http_method,
        body: event.body,
        metadata: RequestMetadata {
            source_ip: event.request_context.identity.source_ip,
            user_agent,
        },
    }
}

pub fn into_proxy_response(response: ApiResponse) -> ApiGatewayProxyResponse {
    let mut headers = HeaderMap::new();
    for (name, value) in response.headers {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(name), value);
            }
            Err(e) => tracing::warn!(header = name, error = %e, "Dropping invalid header value"),
        }
    }

    ApiGatewayProxyResponse {
        status_code: i64::from(response.status.as_u16()),
        headers,
        body: Some(Body::Text(response.body)),
        ..Default::default()
    }
}

#[cfg(feature = "lambda")]
pub use runtime::LambdaHttpHandler;

#[cfg(feature = "lambda")]
mod runtime {
    use super::{into_api_request, into_proxy_response};
    use crate::handlers::RequestHandler;
    use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
    use lambda_runtime::LambdaEvent;
    use telemetry::RequestDone;

    /// Runs a [`RequestHandler`] for each API Gateway event and signals the
    /// flush extension once the response is ready.
    pub struct LambdaHttpHandler<H> {
        handler: H,
        request_done: RequestDone,
    }

    impl<H: RequestHandler> LambdaHttpHandler<H> {
        pub fn new(handler: H, request_done: RequestDone) -> Self {
            Self {
                handler,
                request_done,
            }
        }

        #[tracing::instrument(
            name = "Handling API Gateway event",
            skip(self, event),
            fields(request_id = %event.context.request_id)
        )]
        pub async fn invoke(
            &self,
            event: LambdaEvent<ApiGatewayProxyRequest>,
        ) -> Result<ApiGatewayProxyResponse, lambda_runtime::Error> {
            let request = into_api_request(event.payload);
            let response = self.handler.handle(request).await;

            tracing::info!(status = response.status.as_u16(), "Request handled");

            self.request_done.notify();

            Ok(into_proxy_response(response))
        }
    }
}
