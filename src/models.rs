//! Data models and structures
//!
//! Defines the trigger event payload, the handler response, and runtime
//! configuration loaded from the environment.

use serde::{Deserialize, Serialize};

/// Trigger event delivered by the host runtime when objects are uploaded.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Record {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
}

/// Lambda-style success response returned to the host runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status_code: 200,
            body: body.to_string(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub processed_bucket: String,
    pub sns_topic_arn: String,
}

impl Config {
    /// Load configuration from the environment, failing fast when a
    /// required variable is unset or empty.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            processed_bucket: Self::required("PROCESSED_BUCKET")?,
            sns_topic_arn: Self::required("SNS_TOPIC_ARN")?,
        })
    }

    fn required(name: &str) -> crate::Result<String> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(crate::Error::Config(format!("{} not set", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization() {
        let json = r#"{
            "Records": [
                {
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": { "name": "uploads", "arn": "arn:aws:s3:::uploads" },
                        "object": { "key": "vacation.png", "size": 1024 }
                    }
                }
            ]
        }"#;

        let event: S3Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].s3.bucket.name, "uploads");
        assert_eq!(event.records[0].s3.object.key, "vacation.png");
    }

    #[test]
    fn test_event_with_no_records() {
        let event: S3Event = serde_json::from_str(r#"{"Records": []}"#).unwrap();
        assert!(event.records.is_empty());
    }

    #[test]
    fn test_required_config_value() {
        std::env::set_var("IMAGE_PROCESSOR_TEST_SET", "value");
        assert_eq!(Config::required("IMAGE_PROCESSOR_TEST_SET").unwrap(), "value");

        std::env::set_var("IMAGE_PROCESSOR_TEST_EMPTY", "  ");
        assert!(matches!(
            Config::required("IMAGE_PROCESSOR_TEST_EMPTY"),
            Err(crate::Error::Config(_))
        ));

        assert!(matches!(
            Config::required("IMAGE_PROCESSOR_TEST_UNSET"),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_handler_response_serialization() {
        let response = HandlerResponse::ok("Image processing completed successfully");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"statusCode\":200"));
        assert!(json.contains("Image processing completed successfully"));
    }
}
