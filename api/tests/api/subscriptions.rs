use crate::helpers::spawn_app;
use project_cam_api::domain::SubscriberEmail;
use serde_json::{json, Value};

#[tokio::test]
async fn subscribe_returns_201_for_valid_json() {
    let app = spawn_app().await;
    let body = json!({"email": "a@b.com", "name": "A", "source": "test"});

    let response = app.post_subscribe(body.to_string()).await;

    assert_eq!(201, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://project-cam.com"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "a@b.com");

    let saved = app
        .store
        .get(&SubscriberEmail::parse("a@b.com").unwrap())
        .expect("Subscriber was not stored");
    assert_eq!(saved.name.as_deref(), Some("A"));
    assert_eq!(saved.source, "test");
    assert_eq!(saved.ip_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn subscribe_returns_409_for_an_address_already_on_the_list() {
    let app = spawn_app().await;

    let first = app
        .post_subscribe(json!({"email": "Test@Example.com "}).to_string())
        .await;
    let second = app
        .post_subscribe(json!({"email": "test@example.com"}).to_string())
        .await;

    assert_eq!(201, first.status().as_u16());
    assert_eq!(409, second.status().as_u16());
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Already subscribed");
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn simultaneous_signups_for_one_address_store_one_record() {
    let app = spawn_app().await;
    let body = json!({"email": "race@example.com"}).to_string();

    let (first, second) = tokio::join!(
        app.post_subscribe(body.clone()),
        app.post_subscribe(body.clone())
    );

    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![201, 409]);
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn subscribe_returns_400_when_data_is_invalid() {
    let app = spawn_app().await;
    let test_cases = vec![
        ("{}".to_string(), "Invalid email", "missing the email"),
        (json!({"email": 7}).to_string(), "Invalid email", "a numeric email"),
        (json!({"email": "nope"}).to_string(), "Invalid email format", "a malformed email"),
        ("{\"email\":".to_string(), "Invalid JSON", "truncated json"),
        (String::new(), "Invalid JSON", "an empty body"),
        ("[]".to_string(), "Invalid JSON", "a json array"),
    ];

    for (invalid_body, label, description) in test_cases {
        let response = app.post_subscribe(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], label, "{}", description);
    }
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn preflight_requests_return_cors_headers() {
    let app = spawn_app().await;

    let response = app
        .send_json(reqwest::Method::OPTIONS, "subscribe", String::new())
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-methods"],
        "OPTIONS,POST"
    );
    assert_eq!(
        response.headers()["access-control-allow-headers"],
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "CORS preflight successful");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn other_methods_return_405() {
    let app = spawn_app().await;

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let response = app
            .send_json(method.clone(), "subscribe", json!({"email": "a@b.com"}).to_string())
            .await;

        assert_eq!(405, response.status().as_u16(), "{} was allowed", method);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Method not allowed");
        assert_eq!(body["message"], "Only POST requests are supported");
    }
    assert!(app.store.is_empty());
}
