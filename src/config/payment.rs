//! Payment configuration (Paystack)

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::{require_http_url, ValidationError};
use crate::application::handlers::payment::CheckoutSettings;

/// Payment configuration
///
/// The secret key authenticates outbound API calls and also signs inbound
/// webhooks, so there is no separate webhook secret.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Paystack secret key (`sk_test_...` or `sk_live_...`)
    pub paystack_secret_key: SecretString,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// ISO currency code for every transaction
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Platform cut of split checkouts, in percent
    #[serde(default = "default_platform_fee_percent")]
    pub platform_fee_percent: Decimal,

    /// Where the hosted subscription page redirects after payment
    #[serde(default = "default_subscription_callback_url")]
    pub subscription_callback_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PaymentConfig {
    /// Config with defaults around the given secret key.
    pub fn new(paystack_secret_key: SecretString) -> Self {
        Self {
            paystack_secret_key,
            api_base_url: default_api_base_url(),
            currency: default_currency(),
            platform_fee_percent: default_platform_fee_percent(),
            subscription_callback_url: default_subscription_callback_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    pub fn is_test_mode(&self) -> bool {
        self.paystack_secret_key.expose_secret().starts_with("sk_test_")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            currency: self.currency.clone(),
            platform_fee_percent: self.platform_fee_percent,
            subscription_callback_url: self.subscription_callback_url.clone(),
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.paystack_secret_key.expose_secret();
        if key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PAYSTACK_SECRET_KEY"));
        }
        if !key.starts_with("sk_") {
            return Err(ValidationError::InvalidPaystackKey);
        }
        require_http_url("payment.api_base_url", &self.api_base_url)?;
        require_http_url("payment.subscription_callback_url", &self.subscription_callback_url)?;
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.platform_fee_percent < Decimal::ZERO || self.platform_fee_percent > Decimal::ONE_HUNDRED {
            return Err(ValidationError::InvalidPlatformFee);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("payment"));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_currency() -> String {
    "ZAR".to_string()
}

fn default_platform_fee_percent() -> Decimal {
    Decimal::from(9)
}

fn default_subscription_callback_url() -> String {
    "https://standard.paystack.co/close".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
