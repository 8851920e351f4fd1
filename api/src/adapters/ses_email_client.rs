use crate::domain::{EmailClient, OutboundEmail, SendEmailError};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;

const CHARSET: &str = "UTF-8";

#[derive(Debug, Clone)]
pub struct SesEmailClient {
    client: Client,
    sender: String,
}

impl SesEmailClient {
    pub fn new(client: Client, sender: String) -> Self {
        Self { client, sender }
    }
}

fn utf8_content(data: &str) -> Result<Content, anyhow::Error> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .context("Failed to build email content")
}

#[async_trait]
impl EmailClient for SesEmailClient {
    #[tracing::instrument(
        name = "Sending email through SES",
        skip(self, email),
        fields(subject = %email.subject)
    )]
    async fn send_email(&self, email: &OutboundEmail) -> Result<(), SendEmailError> {
        let body = Body::builder()
            .text(utf8_content(&email.text_content)?)
            .html(utf8_content(&email.html_content)?)
            .build();
        let message = Message::builder()
            .subject(utf8_content(&email.subject)?)
            .body(body)
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&self.sender)
            .destination(
                Destination::builder()
                    .to_addresses(&email.recipient)
                    .build(),
            )
            .reply_to_addresses(&email.reply_to)
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_message_rejected() {
                    SendEmailError::Rejected(service_error.into())
                } else if service_error.is_sending_paused_exception()
                    || service_error.is_account_suspended_exception()
                {
                    SendEmailError::SendingPaused(service_error.into())
                } else {
                    SendEmailError::UnexpectedError(
                        anyhow::Error::new(service_error).context("Failed to send email via SES"),
                    )
                }
            })?;

        tracing::info!(message_id = ?output.message_id, "Email accepted by SES");

        Ok(())
    }
}
