use crate::domain::EmailAddress;

pub const DEFAULT_SUBJECT: &str = "New Contact Form Submission";

/// A validated contact form submission. All text fields are trimmed.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: EmailAddress,
    pub company: Option<String>,
    pub message: String,
    pub subject: String,
}
