use super::ObjectStore;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::collections::HashMap;

pub struct S3Store {
    client: S3Client,
}

impl S3Store {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: S3Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to get {}/{}: {}", bucket, key, e)))?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read body of {}/{}: {}", bucket, key, e)))?;

        Ok(bytes.to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body.to_vec()))
            .content_type(content_type);

        for (name, value) in metadata {
            request = request.metadata(name.as_str(), value.as_str());
        }

        request
            .send()
            .await
            .map_err(|e| Error::StoreWrite(format!("Failed to put {}/{}: {}", bucket, key, e)))?;

        Ok(())
    }
}
