//! HTTP adapter for the encrypted document vault.

mod dto;
mod handlers;
mod routes;

pub use dto::{ImageQuery, StoredDocumentResponse};
pub use routes::vault_routes;
