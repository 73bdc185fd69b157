use super::Notifier;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Default)]
pub struct MockNotifier {
    published: Arc<Mutex<Vec<PublishedMessage>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(Error::Notify("Mock publish failure".to_string()));
        }

        self.published.lock().unwrap().push(PublishedMessage {
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
