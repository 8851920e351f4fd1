use crate::domain::{
    InsertSubscriberError, NewSubscriber, RequestMetadata, SubscriberEmail, SubscriberStore,
    ValidationError,
};
use crate::handlers::{as_text, error_response, non_blank, RequestHandler};
use crate::transport::{ApiRequest, ApiResponse, CorsPolicy, RequestError, ResponseError};
use crate::utils::error_chain_fmt;
use async_trait::async_trait;
use chrono::Utc;
use http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_SOURCE: &str = "website";

#[derive(Deserialize, Debug, Default)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub source: Option<Value>,
}

impl SignupRequest {
    fn into_new_subscriber(
        self,
        metadata: RequestMetadata,
    ) -> Result<NewSubscriber, ValidationError> {
        let email = as_text(&self.email)
            .filter(|e| !e.is_empty())
            .ok_or(ValidationError::MissingEmail)?;
        let email = SubscriberEmail::parse(email)?;

        Ok(NewSubscriber {
            email,
            name: non_blank(&self.name),
            source: non_blank(&self.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            metadata,
        })
    }
}

#[derive(thiserror::Error)]
pub enum SignupError {
    #[error(transparent)]
    RequestError(#[from] RequestError),
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("{0} is already subscribed")]
    AlreadySubscribed(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<InsertSubscriberError> for SignupError {
    fn from(e: InsertSubscriberError) -> Self {
        match e {
            InsertSubscriberError::AlreadyExists(email) => Self::AlreadySubscribed(email),
            InsertSubscriberError::UnexpectedError(e) => Self::UnexpectedError(e),
        }
    }
}

impl ResponseError for SignupError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(e) => e.status_code(),
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::AlreadySubscribed(_) => StatusCode::CONFLICT,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_label(&self) -> &'static str {
        match self {
            Self::RequestError(e) => e.error_label(),
            Self::ValidationError(e) => e.label(),
            Self::AlreadySubscribed(_) => "Already subscribed",
            Self::UnexpectedError(_) => "Internal server error",
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::RequestError(e) => e.public_message(),
            Self::ValidationError(e) => e.public_message(),
            Self::AlreadySubscribed(_) => "This email is already subscribed to our mailing list",
            Self::UnexpectedError(_) => {
                "Unable to process subscription at this time. Please try again later."
            }
        }
    }
}

/// Adds an email address to the mailing list at most once.
pub struct EmailSignupHandler<S> {
    store: S,
    cors: CorsPolicy,
}

impl<S: SubscriberStore> EmailSignupHandler<S> {
    pub fn new(store: S, cors: CorsPolicy) -> Self {
        Self { store, cors }
    }

    async fn subscribe(&self, request: ApiRequest) -> Result<Value, SignupError> {
        request.ensure_post()?;
        let payload: SignupRequest = request.json_payload()?;
        let new_subscriber = payload.into_new_subscriber(request.metadata)?;

        tracing::Span::current().record(
            "subscriber_email",
            tracing::field::display(&new_subscriber.email),
        );

        // Advisory only; the conditional insert below settles duplicates.
        match self.store.subscriber_exists(&new_subscriber.email).await {
            Ok(true) => {
                return Err(SignupError::AlreadySubscribed(
                    new_subscriber.email.to_string(),
                ))
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    "Subscriber lookup failed, continuing with conditional insert"
                );
            }
        }

        let subscriber = new_subscriber.into_record(Utc::now());
        self.store.insert_subscriber(&subscriber).await?;

        tracing::info!("New subscriber saved");

        Ok(json!({
            "success": true,
            "message": "Successfully subscribed to Project Cam updates!",
            "data": {
                "email": subscriber.email,
                "subscribedAt": subscriber.created_at,
            }
        }))
    }
}

#[async_trait]
impl<S: SubscriberStore> RequestHandler for EmailSignupHandler<S> {
    #[tracing::instrument(
        name = "Adding a new subscriber",
        skip(self, request),
        fields(method = %request.method, subscriber_email = tracing::field::Empty)
    )]
    async fn handle(&self, request: ApiRequest) -> ApiResponse {
        if request.method == Method::OPTIONS {
            return ApiResponse::preflight(&self.cors);
        }

        match self.subscribe(request).await {
            Ok(body) => ApiResponse::json(StatusCode::CREATED, &self.cors, body),
            Err(e) => error_response(&e, &self.cors),
        }
    }
}
