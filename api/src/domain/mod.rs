mod contact_notification;
mod contact_submission;
mod email_address;
mod email_client;
mod request_metadata;
mod subscriber;
mod subscriber_store;
mod validation_error;

pub use contact_notification::compose_notification;
pub use contact_submission::{ContactSubmission, DEFAULT_SUBJECT};
pub use email_address::{normalize, EmailAddress, SubscriberEmail};
pub use email_client::{EmailClient, OutboundEmail, SendEmailError};
pub use request_metadata::RequestMetadata;
pub use subscriber::{NewSubscriber, Subscriber, SubscriberStatus};
pub use subscriber_store::{InsertSubscriberError, SubscriberStore};
pub use validation_error::ValidationError;
