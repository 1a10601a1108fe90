//! Resend email adapter.
//!
//! One `POST /emails` per message with the API key as bearer token.
//! Attachments travel inline as base64.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::domain::broadcast::EmailContent;
use crate::ports::{EmailError, EmailSender};

#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    /// Formatted `Name <address>`.
    from: String,
    api_base_url: String,
    timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            api_base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

pub struct ResendEmailSender {
    config: ResendConfig,
    client: Client,
}

#[derive(Serialize)]
struct SendBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentBody<'a>>,
}

#[derive(Serialize)]
struct AttachmentBody<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

impl<'a> SendBody<'a> {
    fn new(from: &'a str, to: &'a str, content: &'a EmailContent) -> Self {
        Self {
            from,
            to: [to],
            subject: &content.subject,
            text: &content.text,
            html: content.html.as_deref(),
            attachments: content
                .attachments
                .iter()
                .map(|a| AttachmentBody {
                    filename: &a.filename,
                    content: STANDARD.encode(&a.bytes),
                    content_type: &a.content_type,
                })
                .collect(),
        }
    }
}

impl ResendEmailSender {
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmailError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, to: &str, content: &EmailContent) -> Result<(), EmailError> {
        let body = SendBody::new(&self.config.from, to, content);

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                recipient: to.to_string(),
                message: format!("{}: {}", status, message),
            });
        }
        Ok(())
    }
}
