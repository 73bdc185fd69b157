//! Application orchestration for one triggering event.
//!
//! Iterates the event's records in order, skips keys that are already
//! derivatives, fetches source bytes, runs the variant generator, and
//! publishes a best-effort completion notification per record.

use crate::models::{Config, HandlerResponse, S3Event};
use crate::notify::{summary_message, summary_subject, Notifier, SnsNotifier};
use crate::store::{ObjectStore, S3Store};
use crate::variants::VariantGenerator;
use crate::Result;
use aws_config::BehaviorVersion;
use std::sync::Arc;
use tracing::{info, warn};

/// Path marker identifying objects that are themselves derivatives. Keys
/// carrying it are skipped to avoid reprocessing outputs as new uploads.
const PROCESSED_MARKER: &str = "processed/";

/// Coordinates source fetch, variant generation, and notification for each
/// record of a triggering event.
pub struct App {
    source: Arc<dyn ObjectStore>,
    generator: VariantGenerator,
    notifier: Box<dyn Notifier>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub store: Arc<dyn ObjectStore>,
    pub notifier: Box<dyn Notifier>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to inject mocks. The store serves both source reads and
    /// destination writes, matching the single reused storage client.
    pub fn with_services(services: AppServices, processed_bucket: String) -> Self {
        Self {
            source: services.store.clone(),
            generator: VariantGenerator::new(services.store, processed_bucket),
            notifier: services.notifier,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub async fn new() -> Result<Self> {
        let config = Config::from_env()?;

        // One shared AWS config; client handles are stateless and reused
        // across warm invocations.
        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let store: Arc<dyn ObjectStore> = Arc::new(S3Store::new(&aws_config));
        let notifier: Box<dyn Notifier> =
            Box::new(SnsNotifier::new(&aws_config, config.sns_topic_arn.clone()));

        Ok(Self::with_services(
            AppServices { store, notifier },
            config.processed_bucket,
        ))
    }

    /// Process every record of one triggering event, strictly sequentially.
    ///
    /// Fetch, decode, encode, and store-write failures abort the whole
    /// invocation and surface to the caller; notification failures are
    /// logged and swallowed.
    pub async fn handle_event(&self, event: &S3Event) -> Result<HandlerResponse> {
        for record in &event.records {
            let bucket = &record.s3.bucket.name;
            let key = &record.s3.object.key;

            info!("Processing image: {} from bucket: {}", key, bucket);

            if key.contains(PROCESSED_MARKER) {
                info!("Skipping already processed image: {}", key);
                continue;
            }

            let image_data = self.source.get_object(bucket, key).await?;

            let results = self.generator.generate(&image_data, key).await?;

            let subject = summary_subject(key);
            let message = summary_message(key, &results);
            if let Err(e) = self.notifier.publish(&subject, &message).await {
                warn!("Error sending notification for {}: {}", key, e);
            }

            info!("Successfully processed {}", key);
        }

        Ok(HandlerResponse::ok("Image processing completed successfully"))
    }
}
