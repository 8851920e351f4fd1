use crate::domain::{Subscriber, SubscriberEmail};
use crate::utils::error_chain_fmt;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(thiserror::Error)]
pub enum InsertSubscriberError {
    #[error("{0} is already subscribed")]
    AlreadyExists(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for InsertSubscriberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Only whether a record is keyed by `email`; its shape is not checked.
    async fn subscriber_exists(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error>;

    /// Writes the record only if no record with the same email exists.
    async fn insert_subscriber(&self, subscriber: &Subscriber)
        -> Result<(), InsertSubscriberError>;
}

#[async_trait]
impl<T: SubscriberStore + ?Sized> SubscriberStore for Arc<T> {
    async fn subscriber_exists(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error> {
        (**self).subscriber_exists(email).await
    }

    async fn insert_subscriber(
        &self,
        subscriber: &Subscriber,
    ) -> Result<(), InsertSubscriberError> {
        (**self).insert_subscriber(subscriber).await
    }
}
