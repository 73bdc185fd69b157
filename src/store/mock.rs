use super::ObjectStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    get_count: Arc<Mutex<usize>>,
    put_count: Arc<Mutex<usize>>,
    fail_puts: Arc<Mutex<bool>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, body: Vec<u8>) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: "application/octet-stream".to_string(),
                metadata: HashMap::new(),
            },
        );
        self
    }

    pub fn with_put_failure(self, fail: bool) -> Self {
        *self.fail_puts.lock().unwrap() = fail;
        self
    }

    pub fn get_count(&self) -> usize {
        *self.get_count.lock().unwrap()
    }

    pub fn put_count(&self) -> usize {
        *self.put_count.lock().unwrap()
    }

    pub fn stored(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let mut count = self.get_count.lock().unwrap();
        *count += 1;
        drop(count);

        let objects = self.objects.lock().unwrap();
        match objects.get(&(bucket.to_string(), key.to_string())) {
            Some(object) => Ok(object.body.clone()),
            None => Err(Error::Fetch(format!("No such object: {}/{}", bucket, key))),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        if *self.fail_puts.lock().unwrap() {
            return Err(Error::StoreWrite(format!(
                "Mock put failure: {}/{}",
                bucket, key
            )));
        }

        let mut count = self.put_count.lock().unwrap();
        *count += 1;
        drop(count);

        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
                metadata: metadata.clone(),
            },
        );
        Ok(())
    }
}
