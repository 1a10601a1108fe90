//! In-Memory Blob Store Adapter
//!
//! Keeps objects in a map keyed by public URL. Used by tests and local
//! development; legacy plaintext objects can be seeded with [`insert`].
//!
//! [`insert`]: InMemoryBlobStore::insert

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{BlobStore, BlobStoreError};

const DEFAULT_BASE_URL: &str = "https://blobs.test";

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
struct State {
    objects: HashMap<String, StoredObject>,
    fail_puts: bool,
    get_calls: usize,
}

/// In-memory object storage.
#[derive(Debug, Clone)]
pub struct InMemoryBlobStore {
    base_url: String,
    state: Arc<Mutex<State>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds an object directly under `url`.
    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.state().objects.insert(
            url.into(),
            StoredObject {
                bytes,
                content_type: "image/jpeg".to_string(),
            },
        );
    }

    /// Raw stored bytes (ciphertext for vault objects).
    pub fn get_raw(&self, url: &str) -> Option<Vec<u8>> {
        self.state().objects.get(url).map(|o| o.bytes.clone())
    }

    pub fn content_type(&self, url: &str) -> Option<String> {
        self.state().objects.get(url).map(|o| o.content_type.clone())
    }

    pub fn object_count(&self) -> usize {
        self.state().objects.len()
    }

    /// Number of `get` calls served so far.
    pub fn get_count(&self) -> usize {
        self.state().get_calls
    }

    /// Makes every subsequent `put` fail with a transport error.
    pub fn fail_puts(&self, fail: bool) {
        self.state().fail_puts = fail;
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, bytes: Vec<u8>, path: &str, content_type: &str) -> Result<String, BlobStoreError> {
        let mut state = self.state();
        if state.fail_puts {
            return Err(BlobStoreError::transport("simulated upload failure"));
        }
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        state.objects.insert(
            url.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(url)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, BlobStoreError> {
        let mut state = self.state();
        state.get_calls += 1;
        state
            .objects
            .get(url)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| BlobStoreError::NotFound(url.to_string()))
    }
}
