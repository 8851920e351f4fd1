use crate::domain::{InsertSubscriberError, Subscriber, SubscriberEmail, SubscriberStore};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local store for development and tests. The check and the write
/// of `insert_subscriber` happen under one lock.
#[derive(Debug, Default)]
pub struct InMemorySubscriberStore {
    subscribers: Mutex<HashMap<SubscriberEmail, Subscriber>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, email: &SubscriberEmail) -> Option<Subscriber> {
        self.subscribers
            .lock()
            .ok()
            .and_then(|s| s.get(email).cloned())
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn subscriber_exists(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error> {
        let subscribers = self
            .subscribers
            .lock()
            .map_err(|_| anyhow!("Subscriber store lock is poisoned"))?;

        Ok(subscribers.contains_key(email))
    }

    async fn insert_subscriber(
        &self,
        subscriber: &Subscriber,
    ) -> Result<(), InsertSubscriberError> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| anyhow!("Subscriber store lock is poisoned"))?;

        match subscribers.entry(subscriber.email.clone()) {
            Entry::Occupied(_) => Err(InsertSubscriberError::AlreadyExists(
                subscriber.email.to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(subscriber.clone());
                Ok(())
            }
        }
    }
}
