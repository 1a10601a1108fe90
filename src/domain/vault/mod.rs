//! Vault module - Encrypted at-rest storage for sensitive documents.

mod cipher;
mod document_vault;
mod errors;
mod reference;
mod temp_file;

pub use cipher::{generate_key_base64, CipherError, KeyProvenance, SecretCipher, KEY_LEN};
pub use document_vault::{DocumentVault, APPLICATION_FOLDER, FACE_FOLDER};
pub use errors::VaultError;
pub use reference::{EncryptedBlobRef, VaultReference, ENCRYPTED_SUFFIX};
pub use temp_file::ScopedTempFile;
