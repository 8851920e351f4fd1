use crate::adapters::{DynamoDbSubscriberStore, InMemorySubscriberStore, SesEmailClient};
use crate::aws::{configure_dynamo, configure_ses, load_sdk_config};
use crate::configuration::Settings;
use crate::domain::{EmailClient, SubscriberStore};
use crate::handlers::{ContactFormHandler, EmailSignupHandler};
use crate::routes::{contact, health_check, subscribe};
use crate::transport::CorsPolicy;
use actix_web::dev::{Server, Service};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::web::Data;
use actix_web::{web, App, HttpMessage, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use telemetry::CustomLevelRootSpanBuilder;
use tracing_actix_web::{RequestId, TracingLogger};

pub type SignupHandler = EmailSignupHandler<Arc<dyn SubscriberStore>>;
pub type ContactHandler = ContactFormHandler<Arc<dyn EmailClient>>;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Wires the local server to the collaborators named in `configuration`.
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let sdk_config = load_sdk_config().await;

        let store: Arc<dyn SubscriberStore> = if configuration.database.in_memory {
            tracing::info!("Keeping subscribers in memory");
            Arc::new(InMemorySubscriberStore::new())
        } else {
            let dynamodb_client = aws_sdk_dynamodb::Client::from_conf(configure_dynamo(
                &sdk_config,
                &configuration.database,
            ));
            Arc::new(DynamoDbSubscriberStore::new(
                dynamodb_client,
                configuration.database.subscribers_table.clone(),
            ))
        };

        let ses_client =
            aws_sdk_sesv2::Client::from_conf(configure_ses(&sdk_config, &configuration.email));
        let email_client: Arc<dyn EmailClient> = Arc::new(SesEmailClient::new(
            ses_client,
            configuration.email.notification_email.clone(),
        ));

        Self::build_with(configuration, store, email_client)
    }

    pub fn build_with(
        configuration: Settings,
        store: Arc<dyn SubscriberStore>,
        email_client: Arc<dyn EmailClient>,
    ) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        ))?;
        let port = listener.local_addr()?.port();

        let cors = CorsPolicy::new(configuration.application.cors_origin);
        let signup_handler = Data::new(SignupHandler::new(store, cors.clone()));
        let contact_handler = Data::new(ContactHandler::new(
            email_client,
            configuration.email.notification_email,
            cors,
        ));

        let server = run(listener, signup_handler, contact_handler)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    signup_handler: Data<SignupHandler>,
    contact_handler: Data<ContactHandler>,
) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let request_id = req.extensions().get::<RequestId>().copied();
                let res = srv.call(req);
                async move {
                    let mut res = res.await?;
                    if let Some(request_id) = request_id {
                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            res.headers_mut()
                                .insert(HeaderName::from_static("x-request-id"), value);
                        }
                    }
                    Ok(res)
                }
            })
            .wrap(TracingLogger::<CustomLevelRootSpanBuilder>::new())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .route("/subscribe", web::route().to(subscribe))
                    .route("/contact", web::route().to(contact)),
            )
            .app_data(signup_handler.clone())
            .app_data(contact_handler.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
