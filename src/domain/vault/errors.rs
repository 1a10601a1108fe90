//! Vault error types.

use axum::http::StatusCode;
use thiserror::Error;

use super::CipherError;
use crate::ports::BlobStoreError;

/// Failures of vault operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// No key is configured; plaintext is never stored instead.
    #[error("Encryption is unavailable: no key configured")]
    EncryptionUnavailable,

    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// Wrong key, corrupted or truncated ciphertext.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Temporary file error: {0}")]
    TempFile(String),
}

impl VaultError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            VaultError::InvalidFolder(_) | VaultError::InvalidReference(_) => {
                StatusCode::BAD_REQUEST
            }
            VaultError::EncryptionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            VaultError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
            VaultError::DownloadFailed(_) => StatusCode::NOT_FOUND,
            VaultError::DecryptionFailed(_) | VaultError::TempFile(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::EncryptionUnavailable => "ENCRYPTION_UNAVAILABLE",
            VaultError::InvalidFolder(_) => "INVALID_FOLDER",
            VaultError::InvalidReference(_) => "INVALID_REFERENCE",
            VaultError::UploadFailed(_) => "UPLOAD_FAILED",
            VaultError::DownloadFailed(_) => "DOWNLOAD_FAILED",
            VaultError::DecryptionFailed(_) => "DECRYPTION_FAILED",
            VaultError::TempFile(_) => "TEMP_FILE_ERROR",
        }
    }
}

impl From<CipherError> for VaultError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::MissingKey => VaultError::EncryptionUnavailable,
            other => VaultError::DecryptionFailed(other.to_string()),
        }
    }
}

impl From<BlobStoreError> for VaultError {
    fn from(err: BlobStoreError) -> Self {
        VaultError::DownloadFailed(err.to_string())
    }
}
