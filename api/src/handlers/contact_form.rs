use crate::domain::{
    compose_notification, ContactSubmission, EmailAddress, EmailClient, SendEmailError,
    ValidationError, DEFAULT_SUBJECT,
};
use crate::handlers::{as_text, error_response, non_blank, RequestHandler};
use crate::transport::{ApiRequest, ApiResponse, CorsPolicy, RequestError, ResponseError};
use crate::utils::{error_chain_fmt, iso_timestamp};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize, Debug, Default)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub company: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub subject: Option<Value>,
}

impl TryFrom<ContactRequest> for ContactSubmission {
    type Error = ValidationError;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        let name = non_blank(&value.name).ok_or(ValidationError::MissingName)?;
        let email = as_text(&value.email)
            .filter(|e| !e.is_empty())
            .ok_or(ValidationError::MissingEmail)?;
        let message = non_blank(&value.message).ok_or(ValidationError::MissingMessage)?;
        let email = EmailAddress::parse(email)?;

        Ok(ContactSubmission {
            name,
            email,
            company: non_blank(&value.company),
            message,
            subject: non_blank(&value.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        })
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    RequestError(#[from] RequestError),
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("The mail service rejected the notification")]
    EmailRejected(#[source] anyhow::Error),
    #[error("The mail service is not accepting messages")]
    ServiceUnavailable(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<SendEmailError> for ContactError {
    fn from(e: SendEmailError) -> Self {
        match e {
            SendEmailError::Rejected(e) => Self::EmailRejected(e),
            SendEmailError::SendingPaused(e) => Self::ServiceUnavailable(e),
            SendEmailError::UnexpectedError(e) => Self::UnexpectedError(e),
        }
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(e) => e.status_code(),
            Self::ValidationError(_) | Self::EmailRejected(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_label(&self) -> &'static str {
        match self {
            Self::RequestError(e) => e.error_label(),
            Self::ValidationError(e) => e.label(),
            Self::EmailRejected(_) => "Email rejected",
            Self::ServiceUnavailable(_) => "Service temporarily unavailable",
            Self::UnexpectedError(_) => "Internal server error",
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::RequestError(e) => e.public_message(),
            Self::ValidationError(e) => e.public_message(),
            Self::EmailRejected(_) => {
                "Unable to send email. Please check your email address and try again."
            }
            Self::ServiceUnavailable(_) => {
                "Email service is temporarily unavailable. Please try again later."
            }
            Self::UnexpectedError(_) => {
                "Unable to process your message at this time. Please try again later."
            }
        }
    }
}

/// Forwards contact form submissions to the operator inbox. Nothing is stored.
pub struct ContactFormHandler<E> {
    email_client: E,
    notification_email: String,
    cors: CorsPolicy,
}

impl<E: EmailClient> ContactFormHandler<E> {
    pub fn new(email_client: E, notification_email: String, cors: CorsPolicy) -> Self {
        Self {
            email_client,
            notification_email,
            cors,
        }
    }

    async fn submit(&self, request: ApiRequest) -> Result<Value, ContactError> {
        request.ensure_post()?;
        let payload: ContactRequest = request.json_payload()?;
        let submission: ContactSubmission = payload.try_into()?;

        let submitted_at = iso_timestamp(Utc::now());
        let notification = compose_notification(
            &submission,
            &request.metadata,
            &submitted_at,
            &self.notification_email,
        )
        .context("Failed to render the contact notification")?;

        self.email_client.send_email(&notification).await?;

        tracing::info!("Contact notification sent");

        Ok(json!({
            "success": true,
            "message": "Thank you for your message! We'll get back to you soon.",
            "data": {
                "submittedAt": submitted_at,
            }
        }))
    }
}

#[async_trait]
impl<E: EmailClient> RequestHandler for ContactFormHandler<E> {
    #[tracing::instrument(
        name = "Forwarding a contact form submission",
        skip(self, request),
        fields(method = %request.method)
    )]
    async fn handle(&self, request: ApiRequest) -> ApiResponse {
        if request.method == Method::OPTIONS {
            return ApiResponse::preflight(&self.cors);
        }

        match self.submit(request).await {
            Ok(body) => ApiResponse::json(StatusCode::OK, &self.cors, body),
            Err(e) => error_response(&e, &self.cors),
        }
    }
}
