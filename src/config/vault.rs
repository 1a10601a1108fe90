//! Vault configuration: encryption key and blob store

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{require_http_url, ValidationError};
use super::server::Environment;
use crate::domain::vault::SecretCipher;

/// Vault configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Base64 32-byte key. Without it documents cannot be stored or read.
    #[serde(default)]
    pub encryption_key: Option<SecretString>,

    /// Generate a throwaway key when none is configured. Everything
    /// encrypted with it is unreadable after a restart.
    #[serde(default)]
    pub allow_ephemeral_key: bool,

    /// Object store endpoint that accepts uploads
    pub blob_upload_base_url: String,

    /// Public prefix under which stored objects are reachable
    pub blob_public_base_url: String,

    /// Bearer token for the object store
    #[serde(default)]
    pub blob_access_token: Option<SecretString>,

    /// Directory for decrypted scratch files; system temp dir when unset
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Blob transfer timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl VaultConfig {
    pub fn new(upload_base_url: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            encryption_key: None,
            allow_ephemeral_key: false,
            blob_upload_base_url: upload_base_url.into(),
            blob_public_base_url: public_base_url.into(),
            blob_access_token: None,
            temp_dir: None,
            request_timeout_secs: default_request_timeout(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate vault configuration
    ///
    /// A malformed key is an error here rather than a silent fallback.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if let Some(key) = &self.encryption_key {
            SecretCipher::from_base64(key.expose_secret())
                .map_err(|_| ValidationError::InvalidEncryptionKey)?;
        }
        if self.allow_ephemeral_key && environment == Environment::Production {
            return Err(ValidationError::EphemeralKeyInProduction);
        }
        require_http_url("vault.blob_upload_base_url", &self.blob_upload_base_url)?;
        require_http_url("vault.blob_public_base_url", &self.blob_public_base_url)?;
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("vault"));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    120
}
