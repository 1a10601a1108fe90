//! SendCustomEmailHandler - One operator-written email to one address.
//!
//! An optional report URL is fetched and attached as `Report.pdf`. A report
//! that cannot be fetched in time is dropped and the message still goes out.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::broadcast::{custom_email, EmailAttachment};
use crate::domain::foundation::ValidationError;
use crate::ports::{BlobStore, EmailError, EmailSender};

/// Attachment fetches give up after this long.
pub const DEFAULT_ATTACHMENT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SendCustomEmailCommand {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_url: Option<String>,
}

/// What was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomEmailReceipt {
    pub attachment_included: bool,
}

#[derive(Debug, Clone, Error)]
pub enum CustomEmailError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Delivery(#[from] EmailError),
}

impl CustomEmailError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Delivery(_) => "EMAIL_DELIVERY_FAILED",
        }
    }
}

pub struct SendCustomEmailHandler {
    sender: Arc<dyn EmailSender>,
    attachments: Arc<dyn BlobStore>,
    attachment_timeout: Duration,
}

impl SendCustomEmailHandler {
    pub fn new(sender: Arc<dyn EmailSender>, attachments: Arc<dyn BlobStore>) -> Self {
        Self {
            sender,
            attachments,
            attachment_timeout: DEFAULT_ATTACHMENT_TIMEOUT,
        }
    }

    pub fn with_attachment_timeout(mut self, timeout: Duration) -> Self {
        self.attachment_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        cmd: SendCustomEmailCommand,
    ) -> Result<CustomEmailReceipt, CustomEmailError> {
        let to = cmd.to.trim();
        if to.is_empty() {
            return Err(ValidationError::empty_field("to").into());
        }
        if !to.contains('@') {
            return Err(ValidationError::invalid_format("to", "not an email address").into());
        }
        let mut content = custom_email(&cmd.subject, &cmd.body)?;

        let url = cmd.attachment_url.as_deref().map(str::trim).filter(|u| !u.is_empty());
        if let Some(url) = url {
            if let Some(bytes) = self.fetch_attachment(url).await {
                content = content.with_attachment(EmailAttachment::report_pdf(bytes));
            }
        }
        let attachment_included = !content.attachments.is_empty();

        self.sender.send(to, &content).await?;
        info!(attachment_included, "Custom email sent");
        Ok(CustomEmailReceipt { attachment_included })
    }

    async fn fetch_attachment(&self, url: &str) -> Option<Vec<u8>> {
        match tokio::time::timeout(self.attachment_timeout, self.attachments.get(url)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!(error = %e, "Attachment fetch failed; sending without it");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.attachment_timeout.as_millis() as u64,
                    "Attachment fetch timed out; sending without it"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::blob_store::InMemoryBlobStore;
    use crate::adapters::email::RecordingEmailSender;
    use crate::ports::BlobStoreError;
    use async_trait::async_trait;

    const REPORT_URL: &str = "https://blobs.test/reports/r1.pdf";

    fn setup() -> (SendCustomEmailHandler, RecordingEmailSender, InMemoryBlobStore) {
        let sender = RecordingEmailSender::new();
        let blobs = InMemoryBlobStore::new();
        let handler = SendCustomEmailHandler::new(Arc::new(sender.clone()), Arc::new(blobs.clone()));
        (handler, sender, blobs)
    }

    fn command(attachment_url: Option<&str>) -> SendCustomEmailCommand {
        SendCustomEmailCommand {
            to: "member@tact.test".into(),
            subject: "Your report".into(),
            body: "Hello,\nYour report is attached.".into(),
            attachment_url: attachment_url.map(String::from),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Delivery
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fetched_report_is_attached() {
        let (handler, sender, blobs) = setup();
        blobs.insert(REPORT_URL, b"%PDF-1.7 report".to_vec());

        let receipt = handler.handle(command(Some(REPORT_URL))).await.unwrap();

        assert!(receipt.attachment_included);
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "member@tact.test");
        assert_eq!(sent[0].content.html.as_deref(), Some("Hello,<br>Your report is attached."));
        assert_eq!(sent[0].content.attachments[0].filename, "Report.pdf");
        assert_eq!(sent[0].content.attachments[0].bytes, b"%PDF-1.7 report".to_vec());
    }

    #[tokio::test]
    async fn missing_report_still_sends_message() {
        let (handler, sender, _) = setup();

        let receipt = handler.handle(command(Some(REPORT_URL))).await.unwrap();

        assert!(!receipt.attachment_included);
        assert_eq!(sender.sent().len(), 1);
        assert!(sender.sent()[0].content.attachments.is_empty());
    }

    #[tokio::test]
    async fn blank_attachment_url_is_not_fetched() {
        let (handler, sender, blobs) = setup();

        handler.handle(command(Some("   "))).await.unwrap();

        assert_eq!(blobs.get_count(), 0);
        assert_eq!(sender.sent().len(), 1);
    }

    struct StalledStore;

    #[async_trait]
    impl BlobStore for StalledStore {
        async fn put(&self, _: Vec<u8>, _: &str, _: &str) -> Result<String, BlobStoreError> {
            Err(BlobStoreError::transport("read only"))
        }

        async fn get(&self, _: &str) -> Result<Vec<u8>, BlobStoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn slow_report_is_dropped_after_timeout() {
        let sender = RecordingEmailSender::new();
        let handler = SendCustomEmailHandler::new(Arc::new(sender.clone()), Arc::new(StalledStore))
            .with_attachment_timeout(Duration::from_millis(20));

        let receipt = handler.handle(command(Some(REPORT_URL))).await.unwrap();

        assert!(!receipt.attachment_included);
        assert_eq!(sender.sent().len(), 1);
    }

    // ══════════════════════════════════════════════════════════════
    // Failures
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_fields_are_rejected_before_sending() {
        let (handler, sender, _) = setup();

        for cmd in [
            SendCustomEmailCommand { to: " ".into(), ..command(None) },
            SendCustomEmailCommand { to: "not-an-address".into(), ..command(None) },
            SendCustomEmailCommand { subject: "".into(), ..command(None) },
            SendCustomEmailCommand { body: "".into(), ..command(None) },
        ] {
            let err = handler.handle(cmd).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn provider_rejection_is_bad_gateway() {
        let (handler, sender, _) = setup();
        sender.fail_for("member@tact.test");

        let err = handler.handle(command(None)).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "EMAIL_DELIVERY_FAILED");
    }
}
