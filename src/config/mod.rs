//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `TACT` prefix and
//! nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use tact_backend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod broadcast;
mod database;
mod email;
mod error;
mod face;
mod payment;
mod server;
mod vault;

pub use broadcast::BroadcastConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use face::FaceConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use vault::VaultConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment configuration (Paystack)
    pub payment: PaymentConfig,

    /// Encryption key and blob store
    pub vault: VaultConfig,

    /// Face model server and match policy
    #[serde(default)]
    pub face: FaceConfig,

    /// Email configuration (Resend); broadcasts are disabled without it
    #[serde(default)]
    pub email: Option<EmailConfig>,

    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TACT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TACT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TACT__PAYMENT__PAYSTACK_SECRET_KEY=...` -> `payment.paystack_secret_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("TACT").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.vault.validate(self.server.environment)?;
        self.face.validate()?;
        if let Some(email) = &self.email {
            email.validate()?;
        }
        self.broadcast.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL: [(&str, &str); 4] = [
        ("TACT__DATABASE__URL", "postgresql://test@localhost/test"),
        ("TACT__PAYMENT__PAYSTACK_SECRET_KEY", "sk_test_xxx"),
        ("TACT__VAULT__BLOB_UPLOAD_BASE_URL", "https://storage.example.com/upload"),
        ("TACT__VAULT__BLOB_PUBLIC_BASE_URL", "https://cdn.example.com"),
    ];

    const OPTIONAL: [&str; 6] = [
        "TACT__SERVER__PORT",
        "TACT__SERVER__ENVIRONMENT",
        "TACT__VAULT__ALLOW_EPHEMERAL_KEY",
        "TACT__FACE__MATCH_THRESHOLD",
        "TACT__EMAIL__RESEND_API_KEY",
        "TACT__PAYMENT__PLATFORM_FEE_PERCENT",
    ];

    fn set_minimal_env() {
        for (key, value) in MINIMAL {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in MINIMAL {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.payment.paystack_secret_key.expose_secret(), "sk_test_xxx");
        assert_eq!(config.vault.blob_public_base_url, "https://cdn.example.com");
        assert!(config.email.is_none());
    }

    #[test]
    fn test_validate_minimal_config() {
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.payment.currency, "ZAR");
        assert_eq!(config.face.match_threshold, 0.50);
        assert_eq!(config.broadcast.workers, 2);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = load_with(&[
            ("TACT__SERVER__PORT", "3000"),
            ("TACT__FACE__MATCH_THRESHOLD", "0.6"),
            ("TACT__PAYMENT__PLATFORM_FEE_PERCENT", "12.5"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert!((config.face.match_threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.payment.platform_fee_percent.to_string(), "12.5");
    }

    #[test]
    fn test_email_section_enables_when_key_present() {
        let config = load_with(&[("TACT__EMAIL__RESEND_API_KEY", "re_xxx")]).unwrap();
        let email = config.email.expect("email section");
        assert_eq!(email.api_base_url, "https://api.resend.com");
    }

    #[test]
    fn test_production_refuses_ephemeral_key() {
        let config = load_with(&[
            ("TACT__SERVER__ENVIRONMENT", "production"),
            ("TACT__VAULT__ALLOW_EPHEMERAL_KEY", "true"),
        ])
        .unwrap();
        assert!(config.is_production());
        assert!(matches!(config.validate(), Err(ValidationError::EphemeralKeyInProduction)));
    }

    #[test]
    fn test_missing_payment_key_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        env::remove_var("TACT__PAYMENT__PAYSTACK_SECRET_KEY");
        let result = AppConfig::load();
        clear_env();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
