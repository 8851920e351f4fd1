/// A request field that failed validation. Each variant maps to a fixed
/// public label and message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email is missing or not a string")]
    MissingEmail,
    #[error("email does not look like local@domain.tld")]
    BadEmailFormat,
    #[error("name is missing or blank")]
    MissingName,
    #[error("message is missing or blank")]
    MissingMessage,
}

impl ValidationError {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingEmail => "Invalid email",
            Self::BadEmailFormat => "Invalid email format",
            Self::MissingName => "Invalid name",
            Self::MissingMessage => "Invalid message",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingEmail => "Email is required and must be a string",
            Self::BadEmailFormat => "Please provide a valid email address",
            Self::MissingName => "Name is required and must be a non-empty string",
            Self::MissingMessage => "Message is required and must be a non-empty string",
        }
    }
}
