//! Blob store adapters.

mod http_blob_store;
mod in_memory;

pub use http_blob_store::{HttpBlobStore, HttpBlobStoreConfig};
pub use in_memory::InMemoryBlobStore;
