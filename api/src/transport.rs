//! Transport-neutral request and response types.
//!
//! The Lambda runtime and the local actix-web server both translate their
//! native request into an [`ApiRequest`] and render the [`ApiResponse`]
//! produced by a handler back into their own response type.

use crate::domain::RequestMetadata;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

const ALLOWED_HEADERS: &str = "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
const ALLOWED_METHODS: &str = "OPTIONS,POST";

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub body: Option<String>,
    pub metadata: RequestMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Header names are lowercase.
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn json(status: StatusCode, cors: &CorsPolicy, body: Value) -> Self {
        Self {
            status,
            headers: cors.headers(),
            body: body.to_string(),
        }
    }

    pub fn preflight(cors: &CorsPolicy) -> Self {
        Self::json(
            StatusCode::OK,
            cors,
            json!({ "message": "CORS preflight successful" }),
        )
    }

    pub fn from_error(error: &impl ResponseError, cors: &CorsPolicy) -> Self {
        Self::json(
            error.status_code(),
            cors,
            json!({
                "error": error.error_label(),
                "message": error.public_message(),
            }),
        )
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Fixed CORS policy attached to every response; only the origin is configurable.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: String,
}

impl CorsPolicy {
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("access-control-allow-origin", self.allow_origin.clone()),
            ("access-control-allow-headers", ALLOWED_HEADERS.to_string()),
            ("access-control-allow-methods", ALLOWED_METHODS.to_string()),
            ("content-type", "application/json".to_string()),
        ]
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new("*")
    }
}

/// How a handler error is rendered for the caller. Internal detail stays in
/// the logs; only the label and the public message are returned.
pub trait ResponseError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    fn error_label(&self) -> &'static str;

    fn public_message(&self) -> &'static str;
}

#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("{0} requests are not supported")]
    MethodNotAllowed(Method),
    #[error("request body is not a JSON object")]
    InvalidJson(#[source] Option<serde_json::Error>),
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_label(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "Method not allowed",
            Self::InvalidJson(_) => "Invalid JSON",
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "Only POST requests are supported",
            Self::InvalidJson(_) => "Request body must be valid JSON",
        }
    }
}

impl ApiRequest {
    pub fn ensure_post(&self) -> Result<(), RequestError> {
        if self.method == Method::POST {
            Ok(())
        } else {
            Err(RequestError::MethodNotAllowed(self.method.clone()))
        }
    }

    /// Parses the body as a JSON object into `T`. A missing body, malformed
    /// JSON and any non-object document are all rejected the same way.
    pub fn json_payload<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let body = self
            .body
            .as_deref()
            .ok_or(RequestError::InvalidJson(None))?;

        let document: Value =
            serde_json::from_str(body).map_err(|e| RequestError::InvalidJson(Some(e)))?;
        if !document.is_object() {
            return Err(RequestError::InvalidJson(None));
        }

        serde_json::from_value(document).map_err(|e| RequestError::InvalidJson(Some(e)))
    }
}
