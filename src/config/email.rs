//! Email configuration (Resend)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::{require_http_url, ValidationError};
use crate::domain::broadcast::LegalLinks;

/// Email configuration. The whole section is optional; without it
/// broadcasts are disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: SecretString,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Public URL of the terms of service
    #[serde(default = "default_terms_url")]
    pub terms_url: String,

    /// Public URL of the privacy policy
    #[serde(default = "default_privacy_url")]
    pub privacy_url: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl EmailConfig {
    pub fn new(resend_api_key: SecretString) -> Self {
        Self {
            resend_api_key,
            from_email: default_from_email(),
            from_name: default_from_name(),
            terms_url: default_terms_url(),
            privacy_url: default_privacy_url(),
            api_base_url: default_api_base_url(),
        }
    }

    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn legal_links(&self) -> LegalLinks {
        LegalLinks {
            terms_url: self.terms_url.clone(),
            privacy_url: self.privacy_url.clone(),
        }
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.resend_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
        }
        if !key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        require_http_url("email.terms_url", &self.terms_url)?;
        require_http_url("email.privacy_url", &self.privacy_url)?;
        require_http_url("email.api_base_url", &self.api_base_url)?;
        Ok(())
    }
}

fn default_from_email() -> String {
    "noreply@tact.app".to_string()
}

fn default_from_name() -> String {
    "TACT".to_string()
}

fn default_terms_url() -> String {
    "https://tact.app/terms".to_string()
}

fn default_privacy_url() -> String {
    "https://tact.app/privacy".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}
