//! Face verification configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::{require_http_url, ValidationError};
use crate::domain::verification::{MatchPolicy, DEFAULT_MATCH_THRESHOLD};

/// Face model server and match policy
#[derive(Debug, Clone, Deserialize)]
pub struct FaceConfig {
    /// Model server base URL. Without it the engine is unavailable.
    #[serde(default)]
    pub model_server_url: Option<String>,

    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Cosine similarity a pair must exceed to match
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl FaceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn match_policy(&self) -> Result<MatchPolicy, ValidationError> {
        MatchPolicy::new(self.match_threshold).map_err(|_| ValidationError::InvalidMatchThreshold)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.match_policy()?;
        if let Some(url) = &self.model_server_url {
            require_http_url("face.model_server_url", url)?;
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("face"));
        }
        Ok(())
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            model_server_url: None,
            model_name: default_model_name(),
            match_threshold: default_match_threshold(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_model_name() -> String {
    "buffalo_l".to_string()
}

fn default_match_threshold() -> f32 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FaceConfig::default();
        assert_eq!(config.model_name, "buffalo_l");
        assert_eq!(config.match_policy().unwrap().threshold(), 0.50);
        assert!(config.model_server_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = FaceConfig {
            match_threshold: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMatchThreshold));
    }

    #[test]
    fn test_model_server_url_checked_when_present() {
        let config = FaceConfig {
            model_server_url: Some("localhost:8500".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
