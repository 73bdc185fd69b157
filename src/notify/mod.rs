//! Completion notifications
//!
//! Composes a plain-text summary of the variants produced for an upload and
//! publishes it to a notification topic. Publishing is best-effort: the
//! orchestrator logs and discards failures.

pub mod client;
pub mod mock;

pub use client::SnsNotifier;
pub use mock::MockNotifier;

use crate::variants::VariantResult;
use crate::Result;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, subject: &str, message: &str) -> Result<()>;
}

/// Subject line for the completion notification of `original_key`.
pub fn summary_subject(original_key: &str) -> String {
    format!("Image Processed: {}", original_key)
}

/// Plain-text summary listing each variant's name, dimensions, and
/// destination key, plus a UTC timestamp.
pub fn summary_message(original_key: &str, results: &[VariantResult]) -> String {
    let mut message = format!(
        "Image Processing Complete!\n\nOriginal Image: {}\nProcessed Variants:\n",
        original_key
    );

    for result in results {
        message.push_str(&format!(
            "  - {}: {}x{} -> {}\n",
            result.variant, result.width, result.height, result.key
        ));
    }

    message.push_str(&format!("\nProcessed at: {}", Utc::now().to_rfc3339()));
    message
}
