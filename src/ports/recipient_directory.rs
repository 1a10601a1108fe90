//! Recipient directory port - who receives member-wide broadcasts.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Email addresses of every member, deduplicated, blanks removed.
    async fn recipient_emails(&self) -> Result<Vec<String>, DomainError>;
}
