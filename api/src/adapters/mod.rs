mod dynamodb_subscriber_store;
mod in_memory_subscriber_store;
mod ses_email_client;

pub use dynamodb_subscriber_store::DynamoDbSubscriberStore;
pub use in_memory_subscriber_store::InMemorySubscriberStore;
pub use ses_email_client::SesEmailClient;
