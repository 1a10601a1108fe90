//! Broadcast module - Legal-update emails sent to every member, and the
//! one-off messages operators send to a single address.

use serde::Serialize;

use crate::domain::foundation::{BroadcastJobId, Timestamp, ValidationError};

pub const LEGAL_UPDATE_SUBJECT: &str = "Important Legal Update";

/// Name given to a report fetched for a custom email.
pub const REPORT_ATTACHMENT_NAME: &str = "Report.pdf";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Which legal documents a broadcast announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegalDocuments {
    pub terms: bool,
    pub policy: bool,
}

impl LegalDocuments {
    /// At least one document must be selected.
    pub fn new(terms: bool, policy: bool) -> Result<Self, ValidationError> {
        if !terms && !policy {
            return Err(ValidationError::invalid_format(
                "documents",
                "select at least one of include_terms or include_policy",
            ));
        }
        Ok(Self { terms, policy })
    }
}

/// Public links to the legal documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalLinks {
    pub terms_url: String,
    pub privacy_url: String,
}

/// A file attached to an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl EmailAttachment {
    pub fn report_pdf(bytes: Vec<u8>) -> Self {
        Self {
            filename: REPORT_ATTACHMENT_NAME.to_string(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            bytes,
        }
    }
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    /// HTML alternative; plain text only when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<EmailAttachment>,
}

impl EmailContent {
    pub fn with_attachment(mut self, attachment: EmailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Renders the legal-update notice.
pub fn legal_update_email(documents: LegalDocuments, links: &LegalLinks) -> EmailContent {
    let mut text = String::from("Dear Member,\n\nWe have updated our legal documents.\n");
    if documents.terms {
        text.push_str(&format!("Terms: {}\n", links.terms_url));
    }
    if documents.policy {
        text.push_str(&format!("Privacy: {}\n", links.privacy_url));
    }
    EmailContent {
        subject: LEGAL_UPDATE_SUBJECT.to_string(),
        text,
        html: None,
        attachments: Vec::new(),
    }
}

/// Renders an operator-written message. Subject and body must be non-blank;
/// the HTML part is the body with line breaks kept.
pub fn custom_email(subject: &str, body: &str) -> Result<EmailContent, ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::empty_field("subject"));
    }
    if body.trim().is_empty() {
        return Err(ValidationError::empty_field("body"));
    }
    Ok(EmailContent {
        subject: subject.trim().to_string(),
        text: body.to_string(),
        html: Some(body.replace("\r\n", "\n").replace('\n', "<br>")),
        attachments: Vec::new(),
    })
}

/// Observable state of a broadcast job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running { sent: usize, failed: usize },
    Completed { sent: usize, failed: usize },
    /// The job could not run at all (e.g. recipient listing failed).
    Failed { reason: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }
}

/// A broadcast job and its progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastJob {
    pub id: BroadcastJobId,
    pub documents: LegalDocuments,
    pub status: JobStatus,
    pub submitted_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl BroadcastJob {
    pub fn queued(documents: LegalDocuments) -> Self {
        Self {
            id: BroadcastJobId::new(),
            documents,
            status: JobStatus::Queued,
            submitted_at: Timestamp::now(),
            finished_at: None,
        }
    }
}
