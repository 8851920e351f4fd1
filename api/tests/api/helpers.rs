use aws_sdk_sesv2::config::retry::RetryConfig;
use aws_sdk_sesv2::config::{BehaviorVersion, Credentials, Region};
use once_cell::sync::Lazy;
use project_cam_api::adapters::{InMemorySubscriberStore, SesEmailClient};
use project_cam_api::configuration::get_configuration;
use project_cam_api::startup::Application;
use secrecy::Secret;
use std::sync::Arc;
use telemetry::{get_subscriber, init_subscriber, init_tracer, TelemetrySettings};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let telemetry_settings = TelemetrySettings {
        otlp_endpoint: String::new(),
        honeycomb_api_key: Secret::new(String::new()),
        dataset_name: "test-project-cam-api".to_string(),
    };
    let default_filter = "info".to_string();
    let subscriber_name = "test".to_string();

    let trace_provider =
        init_tracer(&telemetry_settings).expect("Failed to build a tracer provider");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter,
            std::io::stdout,
            &telemetry_settings,
            &trace_provider,
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter,
            std::io::sink,
            &telemetry_settings,
            &trace_provider,
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemorySubscriberStore>,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscribe(&self, body: String) -> reqwest::Response {
        self.send_json(reqwest::Method::POST, "subscribe", body).await
    }

    pub async fn post_contact(&self, body: String) -> reqwest::Response {
        self.send_json(reqwest::Method::POST, "contact", body).await
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: String,
    ) -> reqwest::Response {
        self.api_client
            .request(method, &format!("{}/api/{}", &self.address, endpoint))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    // Stands in for the SES v2 API
    let email_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration()
            .await
            .expect("Failed to read configuration.");
        c.application.host = "127.0.0.1".to_string();
        // Use a random OS port
        c.application.port = 0;
        c.application.cors_origin = "https://project-cam.com".to_string();
        c.email.notification_email = "ops@project-cam.com".to_string();
        c
    };

    let ses_config = aws_sdk_sesv2::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .retry_config(RetryConfig::disabled())
        .endpoint_url(email_server.uri())
        .build();
    let email_client = SesEmailClient::new(
        aws_sdk_sesv2::Client::from_conf(ses_config),
        configuration.email.notification_email.clone(),
    );

    let store = Arc::new(InMemorySubscriberStore::new());

    let application = Application::build_with(configuration, store.clone(), Arc::new(email_client))
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        store,
        email_server,
        api_client: reqwest::Client::new(),
    }
}
