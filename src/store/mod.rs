//! Object storage integration
//!
//! Reads uploaded source objects and writes processed variants to
//! S3-compatible storage.

pub mod client;
pub mod mock;

pub use client::S3Store;
pub use mock::MockObjectStore;

use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()>;
}
