use crate::domain::{ContactSubmission, OutboundEmail, RequestMetadata};
use minijinja::{context, Environment};
use once_cell::sync::Lazy;

const HTML_TEMPLATE: &str = "contact_notification.html";
const TEXT_TEMPLATE: &str = "contact_notification.txt";

// The `.html` name turns on auto-escaping for submitted values.
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(
        HTML_TEMPLATE,
        include_str!("../../templates/contact_notification.html.jinja"),
    )
    .expect("html notification template is valid");
    env.add_template(
        TEXT_TEMPLATE,
        include_str!("../../templates/contact_notification.txt.jinja"),
    )
    .expect("text notification template is valid");
    env
});

/// Builds the email sent to the operator inbox for a contact form submission.
#[tracing::instrument(name = "Composing contact notification", skip_all)]
pub fn compose_notification(
    submission: &ContactSubmission,
    metadata: &RequestMetadata,
    submitted_at: &str,
    notification_email: &str,
) -> Result<OutboundEmail, minijinja::Error> {
    let ctx = context! {
        name => submission.name,
        email => submission.email.as_ref(),
        company => submission.company,
        message => submission.message,
        message_lines => submission.message.split('\n').collect::<Vec<_>>(),
        submitted_at => submitted_at,
        source_ip => metadata.source_ip.as_deref().unwrap_or("Unknown"),
        user_agent => metadata.user_agent.as_deref().unwrap_or("Unknown"),
    };

    let html_content = TEMPLATES.get_template(HTML_TEMPLATE)?.render(&ctx)?;
    let text_content = TEMPLATES.get_template(TEXT_TEMPLATE)?.render(&ctx)?;

    Ok(OutboundEmail {
        recipient: notification_email.to_string(),
        reply_to: submission.email.to_string(),
        subject: format!("[Project Cam] {}", submission.subject),
        html_content,
        text_content,
    })
}
