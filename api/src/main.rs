use project_cam_api::configuration::get_configuration;
use project_cam_api::startup::Application;
use telemetry::{get_subscriber, init_subscriber, init_tracer};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
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

    let application = Application::build(configuration).await?;
    tracing::info!(port = application.port(), "Local API listening");
    application.run_until_stopped().await?;

    tracer.force_flush();

    Ok(())
}
