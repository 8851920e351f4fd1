use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_extension::{service_fn, Error, Extension};
use lambda_runtime::{run, LambdaEvent};
use project_cam_api::adapters::SesEmailClient;
use project_cam_api::aws::{configure_ses, load_sdk_config};
use project_cam_api::configuration::get_configuration;
use project_cam_api::handlers::ContactFormHandler;
use project_cam_api::lambda::LambdaHttpHandler;
use project_cam_api::transport::CorsPolicy;
use std::sync::Arc;
use telemetry::{get_subscriber, init_subscriber, init_tracer, TraceFlushExtension};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let configuration = get_configuration().await?;

    let tracer = init_tracer(&configuration.telemetry)?;
    let subscriber = get_subscriber(
        configuration.telemetry.dataset_name.clone(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
        &tracer,
    );
    init_subscriber(subscriber);

    let sdk_config = load_sdk_config().await;
    let ses_client =
        aws_sdk_sesv2::Client::from_conf(configure_ses(&sdk_config, &configuration.email));
    let email_client = SesEmailClient::new(
        ses_client,
        configuration.email.notification_email.clone(),
    );

    let (flush_extension, request_done) = TraceFlushExtension::channel(tracer);
    let extension = Extension::new()
        // Internal extensions only support INVOKE events.
        .with_events(&["INVOKE"])
        .with_events_processor(service_fn(|event| {
            let flush_extension = flush_extension.clone();
            async move { flush_extension.invoke(event).await }
        }))
        .with_extension_name("internal-flush")
        // Must be registered before lambda_runtime::run() ends the Init phase.
        .register()
        .await?;

    let handler = Arc::new(LambdaHttpHandler::new(
        ContactFormHandler::new(
            email_client,
            configuration.email.notification_email.clone(),
            CorsPolicy::new(configuration.application.cors_origin.clone()),
        ),
        request_done,
    ));

    tokio::try_join!(
        run(service_fn(|event: LambdaEvent<ApiGatewayProxyRequest>| {
            let handler = handler.clone();
            async move { handler.invoke(event).await }
        })),
        extension.run(),
    )?;

    Ok(())
}
