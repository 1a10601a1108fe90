//! Email sender that records messages instead of sending them.
//!
//! Used by tests and when no email provider is configured in development.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::broadcast::EmailContent;
use crate::ports::{EmailError, EmailSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub content: EmailContent,
}

#[derive(Debug, Default)]
struct State {
    sent: Vec<SentEmail>,
    failing: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    state: Arc<Mutex<State>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Rejects every message to `recipient`.
    pub fn fail_for(&self, recipient: impl Into<String>) {
        self.state().failing.insert(recipient.into());
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.state().sent.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, content: &EmailContent) -> Result<(), EmailError> {
        let mut state = self.state();
        if state.failing.contains(to) {
            return Err(EmailError::Rejected {
                recipient: to.to_string(),
                message: "mailbox unavailable".to_string(),
            });
        }
        state.sent.push(SentEmail {
            to: to.to_string(),
            content: content.clone(),
        });
        Ok(())
    }
}
