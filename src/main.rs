use anyhow::{Context, Result};
use clap::Parser;
use image_processor::app::App;
use image_processor::models::S3Event;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-processor")]
#[command(about = "Generate resized variants for uploaded images")]
struct CliArgs {
    /// Path to the trigger event JSON (S3 notification `Records` payload).
    #[arg(value_name = "EVENT_FILE")]
    event_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let event_json = std::fs::read_to_string(&args.event_file)
        .with_context(|| format!("Failed to read event file {}", args.event_file.display()))?;
    let event: S3Event = serde_json::from_str(&event_json).context("Invalid trigger event JSON")?;

    info!("Starting image-processor ({} records)", event.records.len());

    match App::new().await {
        Ok(app) => match app.handle_event(&event).await {
            Ok(response) => {
                println!("{}", serde_json::to_string(&response)?);
                Ok(())
            }
            Err(e) => {
                error!("Error processing image: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
