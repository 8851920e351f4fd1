use crate::aws::load_sdk_config;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, FileFormat};
use serde::Deserialize;
use telemetry::TelemetrySettings;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin` on every response.
    pub cors_origin: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub subscribers_table: String,
    pub use_local: bool,
    pub local_endpoint: String,
    /// Keep subscribers in process memory instead of DynamoDB. Local development only.
    pub in_memory: bool,
}

#[derive(Deserialize, Clone)]
pub struct EmailSettings {
    /// Operator inbox. Contact notifications are sent from and to this address.
    pub notification_email: String,
    pub use_local: bool,
    pub local_endpoint: String,
}

pub async fn get_configuration() -> Result<Settings, ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    let builder = with_defaults(config::Config::builder())?;

    let builder = match environment {
        Environment::Local => {
            let base_path =
                std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
            let configuration_directory = base_path.join("configuration");
            let environment_filename = format!("{}.yaml", environment.as_str());

            builder
                .add_source(config::File::from(
                    configuration_directory.join("base.yaml"),
                ))
                .add_source(config::File::from(
                    configuration_directory.join(environment_filename),
                ))
        }
        Environment::Production => {
            let document = read_parameter_document().await?;

            builder.add_source(config::File::from_str(&document, FileFormat::Yaml))
        }
    };

    // Add in settings from environment variables (with a prefix of APP and '__' as separator)
    // E.g. `APP_APPLICATION__CORS_ORIGIN=https://project-cam.com` would set `Settings.application.cors_origin`
    let settings = builder
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 3000)?
        .set_default("application.cors_origin", "*")?
        .set_default("database.use_local", false)?
        .set_default("database.local_endpoint", "http://localhost:8000")?
        .set_default("database.in_memory", false)?
        .set_default("email.use_local", false)?
        .set_default("email.local_endpoint", "http://localhost:4566")?
        .set_default("telemetry.otlp_endpoint", "")?
        .set_default("telemetry.honeycomb_api_key", "")
}

/// Production settings live as a single YAML document in SSM Parameter Store.
async fn read_parameter_document() -> Result<String, ConfigError> {
    let parameter_name = std::env::var("CONFIG_PARAMETER_NAME")
        .map_err(|_| ConfigError::NotFound("CONFIG_PARAMETER_NAME".to_string()))?;

    let sdk_config = load_sdk_config().await;
    let ssm_client = aws_sdk_ssm::Client::new(&sdk_config);

    let output = ssm_client
        .get_parameter()
        .name(&parameter_name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    output
        .parameter
        .and_then(|parameter| parameter.value)
        .ok_or(ConfigError::NotFound(parameter_name))
}

#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either local or production",
                other
            )),
        }
    }
}
