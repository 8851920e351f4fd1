use crate::domain::{InsertSubscriberError, Subscriber, SubscriberEmail, SubscriberStore};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct DynamoDbSubscriberStore {
    client: Client,
    table_name: String,
}

impl DynamoDbSubscriberStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl SubscriberStore for DynamoDbSubscriberStore {
    #[tracing::instrument(name = "Looking up subscriber", skip(self), fields(table = %self.table_name))]
    async fn subscriber_exists(&self, email: &SubscriberEmail) -> Result<bool, anyhow::Error> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("email", AttributeValue::S(email.to_string()))
            .projection_expression("email")
            .send()
            .await
            .context(format!(
                "Failure reading subscriber from DynamoDB. Using table {}",
                &self.table_name
            ))?;

        Ok(output.item.is_some())
    }

    #[tracing::instrument(
        name = "Inserting subscriber",
        skip(self, subscriber),
        fields(table = %self.table_name, subscriber_email = %subscriber.email)
    )]
    async fn insert_subscriber(
        &self,
        subscriber: &Subscriber,
    ) -> Result<(), InsertSubscriberError> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(subscriber)
            .context("Failed to convert subscriber into a DynamoDB item")?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(email)")
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    InsertSubscriberError::AlreadyExists(subscriber.email.to_string())
                } else {
                    InsertSubscriberError::UnexpectedError(anyhow::Error::new(service_error).context(
                        format!(
                            "Failure inserting record to DynamoDB. Using table {}",
                            &self.table_name
                        ),
                    ))
                }
            })?;

        Ok(())
    }
}
