use crate::helpers::spawn_app;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn contact_body() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "company": "Acme Builders",
        "message": "We'd like a demo.\nThursdays work best.",
        "subject": "Demo request"
    })
}

fn ses_error(error_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(400)
        .insert_header("x-amzn-errortype", error_type)
        .set_body_json(json!({ "message": "nope" }))
}

#[tokio::test]
async fn contact_sends_a_notification_and_returns_200() {
    let app = spawn_app().await;

    Mock::given(path("/v2/email/outbound-emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"MessageId": "0100-abc"})))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(contact_body().to_string()).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["submittedAt"].is_string());

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let sent: Value = serde_json::from_slice(&email_request.body).unwrap();
    assert_eq!(sent["FromEmailAddress"], "ops@project-cam.com");
    assert_eq!(sent["Destination"]["ToAddresses"][0], "ops@project-cam.com");
    assert_eq!(sent["ReplyToAddresses"][0], "jane@example.com");
    assert_eq!(
        sent["Content"]["Simple"]["Subject"]["Data"],
        "[Project Cam] Demo request"
    );
    let html = sent["Content"]["Simple"]["Body"]["Html"]["Data"]
        .as_str()
        .unwrap();
    assert!(html.contains("We&#x27;d like a demo.<br>Thursdays work best."));
}

#[tokio::test]
async fn contact_without_a_message_returns_400_and_sends_nothing() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_contact(json!({"name": "Jane", "email": "jane@example.com"}).to_string())
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid message");
}

#[tokio::test]
async fn a_rejected_message_returns_400() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .respond_with(ses_error("MessageRejected"))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(contact_body().to_string()).await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email rejected");
}

#[tokio::test]
async fn paused_sending_returns_503() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .respond_with(ses_error("SendingPausedException"))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(contact_body().to_string()).await;

    assert_eq!(503, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Service temporarily unavailable");
}

#[tokio::test]
async fn preflight_contact_requests_send_nothing() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .send_json(reqwest::Method::OPTIONS, "contact", String::new())
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://project-cam.com"
    );
}
