//! HTTP DTOs for vault endpoints.

use serde::{Deserialize, Serialize};

/// Multipart field carrying the document bytes.
pub const FILE_FIELD: &str = "file";

/// Multipart field naming the destination folder.
pub const FOLDER_FIELD: &str = "folder";

/// Query of `GET /api/vault/image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    /// Vault reference or legacy plaintext URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocumentResponse {
    pub url: String,
}
