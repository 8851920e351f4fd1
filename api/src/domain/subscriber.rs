use crate::domain::{RequestMetadata, SubscriberEmail};
use crate::utils::iso_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    Active,
}

/// A stored mailing list entry, keyed by the normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub name: Option<String>,
    pub source: String,
    pub created_at: String,
    pub updated_at: String,
    pub status: SubscriberStatus,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: Option<String>,
    pub source: String,
    pub metadata: RequestMetadata,
}

impl NewSubscriber {
    pub fn into_record(self, subscribed_at: DateTime<Utc>) -> Subscriber {
        let timestamp = iso_timestamp(subscribed_at);

        Subscriber {
            email: self.email,
            name: self.name,
            source: self.source,
            created_at: timestamp.clone(),
            updated_at: timestamp,
            status: SubscriberStatus::Active,
            ip_address: self.metadata.source_ip,
            user_agent: self.metadata.user_agent,
        }
    }
}
