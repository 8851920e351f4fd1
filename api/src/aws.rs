use crate::configuration::{DatabaseSettings, EmailSettings};
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};

pub fn make_region_provider() -> RegionProviderChain {
    RegionProviderChain::default_provider().or_else(Region::new("us-east-1"))
}

/// Shared SDK configuration. A failed call surfaces to the caller after a
/// single attempt, so retries are disabled.
pub async fn load_sdk_config() -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(make_region_provider())
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}

pub fn configure_dynamo(
    sdk_config: &SdkConfig,
    db_settings: &DatabaseSettings,
) -> aws_sdk_dynamodb::Config {
    let conf_builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

    match db_settings.use_local {
        true => conf_builder
            .endpoint_url(db_settings.local_endpoint.clone())
            .build(),
        false => conf_builder.build(),
    }
}

pub fn configure_ses(sdk_config: &SdkConfig, email_settings: &EmailSettings) -> aws_sdk_sesv2::Config {
    let conf_builder = aws_sdk_sesv2::config::Builder::from(sdk_config);

    match email_settings.use_local {
        true => conf_builder
            .endpoint_url(email_settings.local_endpoint.clone())
            .build(),
        false => conf_builder.build(),
    }
}
