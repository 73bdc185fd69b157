use super::Notifier;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;

pub struct SnsNotifier {
    client: SnsClient,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(config: &aws_config::SdkConfig, topic_arn: String) -> Self {
        Self {
            client: SnsClient::new(config),
            topic_arn,
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<()> {
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| Error::Notify(format!("Failed to publish to {}: {}", self.topic_arn, e)))?;

        Ok(())
    }
}
