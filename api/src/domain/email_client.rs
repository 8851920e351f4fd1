use crate::utils::error_chain_fmt;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipient: String,
    pub reply_to: String,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
}

#[derive(thiserror::Error)]
pub enum SendEmailError {
    #[error("the mail service rejected the message")]
    Rejected(#[source] anyhow::Error),
    #[error("sending is paused for this account")]
    SendingPaused(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SendEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(&self, email: &OutboundEmail) -> Result<(), SendEmailError>;
}

#[async_trait]
impl<T: EmailClient + ?Sized> EmailClient for Arc<T> {
    async fn send_email(&self, email: &OutboundEmail) -> Result<(), SendEmailError> {
        (**self).send_email(email).await
    }
}
