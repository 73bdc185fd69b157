//! Event-triggered image variant generation.
//!
//! On notification of a newly uploaded image object this service downloads
//! the object, produces a fixed set of resized JPEG variants, writes each
//! variant back to a processed bucket, and publishes a plain-text summary
//! notification.

pub mod app;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod variants;

pub use error::{Error, Result};
