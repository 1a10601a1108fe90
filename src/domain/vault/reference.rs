//! Vault references: URLs naming stored blobs.
//!
//! A reference whose path ends in `.enc` was written by the vault and must
//! be decrypted. Any other absolute http(s) URL predates encryption and is
//! served as plaintext. Everything else is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::VaultError;

/// Suffix marking a ciphertext object.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// URL of a ciphertext blob written by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedBlobRef(String);

impl EncryptedBlobRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EncryptedBlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed reference locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultReference {
    /// Ciphertext; fetch then decrypt.
    Encrypted(EncryptedBlobRef),
    /// Historical plaintext object; fetch as-is.
    Legacy(String),
}

impl VaultReference {
    /// Classifies a raw locator string.
    pub fn parse(raw: &str) -> Result<Self, VaultError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(VaultError::InvalidReference("reference is empty".to_string()));
        }
        if !is_absolute_http_url(raw) {
            return Err(VaultError::InvalidReference(format!(
                "not an absolute http(s) URL: {}",
                truncate_for_log(raw)
            )));
        }

        let path = raw.split(['?', '#']).next().unwrap_or(raw);
        if path.ends_with(ENCRYPTED_SUFFIX) {
            Ok(Self::Encrypted(EncryptedBlobRef(raw.to_string())))
        } else {
            Ok(Self::Legacy(raw.to_string()))
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Encrypted(r) => r.as_str(),
            Self::Legacy(url) => url,
        }
    }

    pub fn requires_decryption(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

impl From<EncryptedBlobRef> for VaultReference {
    fn from(r: EncryptedBlobRef) -> Self {
        Self::Encrypted(r)
    }
}

pub(crate) fn encrypted_ref_from_url(url: String) -> EncryptedBlobRef {
    EncryptedBlobRef(url)
}

fn is_absolute_http_url(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    let rest = if let Some(rest) = lower.strip_prefix("https://") {
        rest
    } else if let Some(rest) = lower.strip_prefix("http://") {
        rest
    } else {
        return false;
    };
    // Require a host.
    !rest.is_empty() && !rest.starts_with('/')
}

fn truncate_for_log(raw: &str) -> String {
    raw.chars().take(64).collect()
}
