//! Blob Store Port - Opaque URL-addressable object storage.
//!
//! The vault only ever needs two operations: put bytes under a path and get
//! a public URL back, and fetch bytes from such a URL. Bucket layout, ACLs
//! and signing live entirely in the adapter.

use async_trait::async_trait;
use thiserror::Error;

/// Port for remote object storage.
///
/// # Contract
///
/// Implementations must:
/// - Make objects written by `put` fetchable by the returned URL
/// - Return `BlobStoreError::NotFound` when `get` targets a missing object
/// - Never retry internally; callers decide what to do with failures
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the object's public URL.
    ///
    /// `path` is a slash-separated object name such as
    /// `secure_applications/4f0c...e1.enc`.
    async fn put(&self, bytes: Vec<u8>, path: &str, content_type: &str)
        -> Result<String, BlobStoreError>;

    /// Fetches the object behind a public URL.
    async fn get(&self, url: &str) -> Result<Vec<u8>, BlobStoreError>;
}

/// Errors from the object storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobStoreError {
    /// No object at the URL.
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Storage answered with an error status.
    #[error("Blob store rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Connection, timeout or body read failure.
    #[error("Blob store transport error: {0}")]
    Transport(String),
}

impl BlobStoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
