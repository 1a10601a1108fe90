//! Email Sender Port - Transactional email delivery.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::broadcast::EmailContent;

/// Port for sending a single email.
///
/// Implementations send one message per call and do not retry; the
/// broadcast job counts failures and moves on.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, content: &EmailContent) -> Result<(), EmailError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email provider rejected message to {recipient}: {message}")]
    Rejected { recipient: String, message: String },

    #[error("Email provider unreachable: {0}")]
    Network(String),
}
