//! Process-wide symmetric cipher for documents at rest.
//!
//! Payloads are sealed with ChaCha20-Poly1305. The stored layout is
//! `version (1) || nonce (12) || ciphertext+tag`, so a truncated download or
//! a blob sealed under another key fails authentication instead of yielding
//! garbage plaintext.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Length of the symmetric key in bytes.
pub const KEY_LEN: usize = 32;

const FORMAT_VERSION: u8 = 0x01;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Where the active key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyProvenance {
    /// Loaded from configuration; survives restarts.
    Configured,
    /// Generated at startup; everything sealed with it is lost on restart.
    Ephemeral,
}

/// Errors raised by the cipher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("No encryption key configured")]
    MissingKey,

    #[error("Encryption key is invalid: {0}")]
    InvalidKey(String),

    #[error("Ciphertext is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("Unsupported ciphertext format version {0:#04x}")]
    UnsupportedFormat(u8),

    /// Wrong key or tampered/corrupted ciphertext.
    #[error("Ciphertext failed authentication")]
    Authentication,

    #[error("Encryption failed")]
    Encryption,
}

/// Symmetric encrypt/decrypt with a single key.
#[derive(Clone)]
pub struct SecretCipher {
    aead: ChaCha20Poly1305,
    provenance: KeyProvenance,
}

impl SecretCipher {
    /// Builds the cipher from configuration.
    ///
    /// A missing key is an error unless `allow_ephemeral` is set, in which
    /// case a random key is generated and the hazard is logged at error level.
    pub fn init(key: Option<&SecretString>, allow_ephemeral: bool) -> Result<Self, CipherError> {
        match key {
            Some(key) => Self::from_base64(key.expose_secret()),
            None if allow_ephemeral => {
                tracing::error!(
                    alert = "ephemeral_encryption_key",
                    "No vault encryption key configured; using an EPHEMERAL key. \
                     Every document stored by this process becomes undecryptable after restart"
                );
                Ok(Self::ephemeral())
            }
            None => {
                tracing::error!(
                    alert = "missing_encryption_key",
                    "No vault encryption key configured; encrypted storage is disabled"
                );
                Err(CipherError::MissingKey)
            }
        }
    }

    /// Parses a base64 key (URL-safe or standard alphabet).
    pub fn from_base64(encoded: &str) -> Result<Self, CipherError> {
        let encoded = encoded.trim();
        let bytes = URL_SAFE
            .decode(encoded)
            .or_else(|_| STANDARD.decode(encoded))
            .map_err(|e| CipherError::InvalidKey(format!("not base64: {}", e)))?;
        Self::from_key_bytes(&bytes, KeyProvenance::Configured)
    }

    /// Generates a throwaway key.
    pub fn ephemeral() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self {
            aead: ChaCha20Poly1305::new(Key::from_slice(&key)),
            provenance: KeyProvenance::Ephemeral,
        }
    }

    fn from_key_bytes(bytes: &[u8], provenance: KeyProvenance) -> Result<Self, CipherError> {
        if bytes.len() != KEY_LEN {
            return Err(CipherError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            )));
        }
        let aead = ChaCha20Poly1305::new_from_slice(bytes)
            .map_err(|e| CipherError::InvalidKey(e.to_string()))?;
        Ok(Self { aead, provenance })
    }

    pub fn provenance(&self) -> KeyProvenance {
        self.provenance
    }

    /// Seals `plaintext` under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = self
            .aead
            .encrypt(nonce, plaintext)
            .map_err(|_| CipherError::Encryption)?;

        let mut out = Vec::with_capacity(HEADER_LEN + sealed.len());
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    /// Opens a blob produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CipherError> {
        if blob.len() < HEADER_LEN + TAG_LEN {
            return Err(CipherError::Truncated(blob.len()));
        }
        if blob[0] != FORMAT_VERSION {
            return Err(CipherError::UnsupportedFormat(blob[0]));
        }
        let nonce = Nonce::from_slice(&blob[1..HEADER_LEN]);
        self.aead
            .decrypt(nonce, &blob[HEADER_LEN..])
            .map_err(|_| CipherError::Authentication)
    }
}

impl fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCipher")
            .field("key", &"[REDACTED]")
            .field("provenance", &self.provenance)
            .finish()
    }
}

/// Generates a fresh key in the encoding `from_base64` accepts.
pub fn generate_key_base64() -> String {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    URL_SAFE.encode(key)
}
