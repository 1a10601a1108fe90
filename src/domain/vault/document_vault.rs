//! Encrypted document vault.
//!
//! Composes the [`SecretCipher`] with a [`BlobStore`] so callers can persist
//! sensitive files (face photos, application documents) and read them back
//! without ever handling ciphertext.

use rand::rngs::OsRng;
use rand::RngCore;
use std::path::PathBuf;
use std::sync::Arc;

use super::reference::encrypted_ref_from_url;
use super::{
    EncryptedBlobRef, KeyProvenance, ScopedTempFile, SecretCipher, VaultError, VaultReference,
    ENCRYPTED_SUFFIX,
};
use crate::ports::BlobStore;

const CIPHERTEXT_CONTENT_TYPE: &str = "application/octet-stream";
const PLAINTEXT_SUFFIX: &str = ".jpg";

/// Folder for application documents.
pub const APPLICATION_FOLDER: &str = "secure_applications";
/// Folder for reference face photos.
pub const FACE_FOLDER: &str = "faces";
const OBJECT_NAME_BYTES: usize = 16;

/// Stores and retrieves encrypted blobs.
pub struct DocumentVault {
    blobs: Arc<dyn BlobStore>,
    cipher: Option<Arc<SecretCipher>>,
    temp_dir: Option<PathBuf>,
}

impl DocumentVault {
    /// Creates a vault. `cipher` is `None` when no key is configured.
    pub fn new(blobs: Arc<dyn BlobStore>, cipher: Option<SecretCipher>) -> Self {
        Self {
            blobs,
            cipher: cipher.map(Arc::new),
            temp_dir: None,
        }
    }

    /// Places scoped temp files under `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Provenance of the active key, `None` when encryption is unavailable.
    pub fn key_provenance(&self) -> Option<KeyProvenance> {
        self.cipher.as_ref().map(|c| c.provenance())
    }

    /// Encrypts `raw` and uploads it as `folder/<128-bit hex>.enc`.
    pub async fn store(&self, raw: &[u8], folder: &str) -> Result<EncryptedBlobRef, VaultError> {
        let cipher = self.cipher.as_ref().ok_or(VaultError::EncryptionUnavailable)?;
        let folder = normalize_folder(folder)?;

        let ciphertext = cipher
            .encrypt(raw)
            .map_err(|e| VaultError::UploadFailed(e.to_string()))?;
        let object_name = format!("{}/{}{}", folder, random_object_id(), ENCRYPTED_SUFFIX);

        let url = self
            .blobs
            .put(ciphertext, &object_name, CIPHERTEXT_CONTENT_TYPE)
            .await
            .map_err(|e| {
                tracing::error!(object = %object_name, error = %e, "Vault upload failed");
                VaultError::UploadFailed(e.to_string())
            })?;

        tracing::info!(object = %object_name, bytes = raw.len(), "Stored encrypted document");
        Ok(encrypted_ref_from_url(url))
    }

    /// Fetches a reference and returns its plaintext bytes.
    ///
    /// Legacy references are returned as downloaded.
    pub async fn fetch_plaintext(&self, reference: &VaultReference) -> Result<Vec<u8>, VaultError> {
        match reference {
            VaultReference::Encrypted(blob_ref) => {
                // Check the key first so a missing key never costs a download.
                let cipher = self.cipher.as_ref().ok_or(VaultError::EncryptionUnavailable)?;
                let ciphertext = self.download(blob_ref.as_str()).await?;
                cipher.decrypt(&ciphertext).map_err(|e| {
                    tracing::warn!(reference = %blob_ref, error = %e, "Vault decryption failed");
                    VaultError::DecryptionFailed(e.to_string())
                })
            }
            VaultReference::Legacy(url) => {
                tracing::debug!(reference = %url, "Fetching legacy plaintext reference");
                self.download(url).await
            }
        }
    }

    /// Fetches, decrypts when needed, and writes plaintext to a scoped temp file.
    ///
    /// Nothing touches disk until decryption succeeds.
    pub async fn retrieve_to_temp(&self, reference: &VaultReference) -> Result<ScopedTempFile, VaultError> {
        let plaintext = self.fetch_plaintext(reference).await?;
        self.write_temp(plaintext).await
    }

    /// Writes caller-supplied plaintext to a scoped temp file.
    pub async fn write_temp(&self, plaintext: Vec<u8>) -> Result<ScopedTempFile, VaultError> {
        ScopedTempFile::write(plaintext, self.temp_dir.clone(), PLAINTEXT_SUFFIX)
            .await
            .map_err(|e| VaultError::TempFile(e.to_string()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, VaultError> {
        self.blobs.get(url).await.map_err(|e| {
            tracing::warn!(reference = %url, error = %e, "Vault download failed");
            VaultError::from(e)
        })
    }
}

/// Validates a folder as `/`-separated segments of `[A-Za-z0-9_-]`.
fn normalize_folder(folder: &str) -> Result<String, VaultError> {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(VaultError::InvalidFolder("folder is empty".to_string()));
    }
    let valid = trimmed.split('/').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });
    if !valid {
        return Err(VaultError::InvalidFolder(folder.to_string()));
    }
    Ok(trimmed.to_string())
}

fn random_object_id() -> String {
    let mut bytes = [0u8; OBJECT_NAME_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
