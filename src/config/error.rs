//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("Upload limit must be greater than zero")]
    InvalidUploadLimit,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("{0} must be an absolute http(s) URL")]
    InvalidUrl(&'static str),

    #[error("Invalid Paystack secret key format")]
    InvalidPaystackKey,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("Platform fee must be between 0 and 100 percent")]
    InvalidPlatformFee,

    #[error("Encryption key must be a base64-encoded 32-byte key")]
    InvalidEncryptionKey,

    #[error("Ephemeral encryption keys are not allowed in production")]
    EphemeralKeyInProduction,

    #[error("Match threshold must be within [-1, 1]")]
    InvalidMatchThreshold,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Broadcast pool needs at least one worker")]
    InvalidWorkerCount,

    #[error("Broadcast queue capacity must be at least one")]
    InvalidQueueCapacity,

    #[error("Broadcast job retention must be at least one")]
    InvalidJobRetention,
}

/// Shared check for URL-valued settings.
pub(crate) fn require_http_url(name: &'static str, url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or(ValidationError::InvalidUrl(name))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(ValidationError::InvalidUrl(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(require_http_url("x", "https://api.paystack.co").is_ok());
        assert!(require_http_url("x", "http://localhost:9000/upload").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_empty_hosts() {
        for bad in ["", "ftp://host", "https://", "http:///path", "api.paystack.co"] {
            assert_eq!(require_http_url("x", bad), Err(ValidationError::InvalidUrl("x")), "{bad}");
        }
    }
}
