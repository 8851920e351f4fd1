mod contact_form;
mod email_signup;

pub use contact_form::{ContactError, ContactFormHandler, ContactRequest};
pub use email_signup::{EmailSignupHandler, SignupError, SignupRequest};

use crate::transport::{ApiRequest, ApiResponse, CorsPolicy, ResponseError};
use async_trait::async_trait;
use serde_json::Value;

/// A transport-neutral endpoint. Every outcome, including failures, is
/// rendered as an [`ApiResponse`].
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: ApiRequest) -> ApiResponse;
}

fn error_response<E: ResponseError>(error: &E, cors: &CorsPolicy) -> ApiResponse {
    if error.status_code().is_server_error() {
        tracing::error!(
            error.cause_chain = ?error,
            error.message = %error,
            "Request failed"
        );
    } else {
        tracing::warn!(error.message = %error, "Request rejected");
    }

    ApiResponse::from_error(error, cors)
}

/// The field as a string. Other JSON types count as absent.
fn as_text(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// The trimmed field, if it is a string with any non-whitespace content.
fn non_blank(field: &Option<Value>) -> Option<String> {
    as_text(field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
