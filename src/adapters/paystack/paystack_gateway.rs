//! Paystack payment gateway adapter.
//!
//! Implements `PaymentGateway` against the Paystack REST API with the
//! secret key as bearer token.
//!
//! # Configuration
//!
//! ```ignore
//! let config = PaystackConfig::new(secret_key);
//! let gateway = PaystackGateway::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::ports::{
    CreateSubaccountRequest, GatewayError, InitializeTransactionRequest, PaymentGateway,
    Subaccount, TransactionAuthorization, TransactionVerification,
};

use super::api_types::{
    ApiEnvelope, ApiRefusal, InitializeBody, InitializeData, MetadataBody, SplitBody,
    SubaccountBody, SubaccountData, VerifyData,
};

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Secret key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Base URL for the API (default: https://api.paystack.co).
    api_base_url: String,

    timeout: Duration,
}

impl PaystackConfig {
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            api_base_url: "https://api.paystack.co".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Paystack gateway adapter.
pub struct PaystackGateway {
    config: PaystackConfig,
    http_client: Client,
}

impl PaystackGateway {
    pub fn new(config: PaystackConfig) -> Result<Self, GatewayError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http_client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Reads the `{status, message, data}` envelope of any response.
    ///
    /// Paystack answers refusals with 4xx plus an envelope; those become
    /// `Rejected` with its message. 5xx is treated as a network-level fault.
    async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport)?;

        if status.is_server_error() {
            tracing::error!(status = %status, "Paystack server error");
            return Err(GatewayError::network(format!("Paystack returned {}", status)));
        }
        if status.is_client_error() {
            let refusal: ApiRefusal = serde_json::from_slice(&body).unwrap_or_default();
            let message = refusal
                .message
                .unwrap_or_else(|| format!("Paystack validation failed ({})", status));
            tracing::warn!(status = %status, message = %message, "Paystack rejected request");
            return Err(GatewayError::Rejected(message));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::malformed(format!("invalid JSON: {}", e)))?;
        envelope.into_data()
    }
}

fn map_transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::network("request timed out")
    } else {
        GatewayError::network(e.to_string())
    }
}

fn transaction_id(id: Option<&Value>) -> Option<String> {
    match id? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<TransactionAuthorization, GatewayError> {
        let body = InitializeBody {
            email: &request.email,
            amount: request.amount_minor_units.to_string(),
            currency: &request.currency,
            reference: &request.reference,
            plan: request.plan.as_deref(),
            callback_url: request.callback_url.as_deref(),
            channels: &request.channels,
            metadata: (!request.custom_fields.is_empty()).then(|| MetadataBody {
                custom_fields: &request.custom_fields,
            }),
            split: request
                .split
                .as_deref()
                .filter(|shares| !shares.is_empty())
                .map(|shares| SplitBody {
                    split_type: "flat",
                    subaccounts: shares,
                }),
        };

        tracing::debug!(reference = %request.reference, "Initializing Paystack transaction");
        let response = self
            .http_client
            .post(self.url("/transaction/initialize"))
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        let data: InitializeData = Self::read_envelope(response).await?;
        Ok(TransactionAuthorization {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference: data.reference.unwrap_or(request.reference),
        })
    }

    async fn create_subaccount(
        &self,
        request: CreateSubaccountRequest,
    ) -> Result<Subaccount, GatewayError> {
        let percentage_charge = request
            .percentage_charge
            .to_f64()
            .ok_or_else(|| GatewayError::Rejected("percentage_charge out of range".into()))?;
        let body = SubaccountBody {
            business_name: &request.business_name,
            settlement_bank: &request.bank_code,
            account_number: &request.account_number,
            percentage_charge,
            primary_contact_email: &request.primary_contact_email,
        };

        let response = self
            .http_client
            .post(self.url("/subaccount"))
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        let data: SubaccountData = Self::read_envelope(response).await?;
        tracing::info!(subaccount_code = %data.subaccount_code, "Paystack subaccount created");
        Ok(Subaccount {
            subaccount_code: data.subaccount_code,
        })
    }

    async fn verify_transaction(&self, reference: &str) -> Result<TransactionVerification, GatewayError> {
        let response = self
            .http_client
            .get(self.url(&format!("/transaction/verify/{}", reference)))
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await
            .map_err(map_transport)?;

        let raw: Value = Self::read_envelope(response).await?;
        let data: VerifyData = serde_json::from_value(raw.clone())
            .map_err(|e| GatewayError::malformed(format!("verify data: {}", e)))?;

        Ok(TransactionVerification {
            reference: data.reference.unwrap_or_else(|| reference.to_string()),
            status: data.status.unwrap_or_default(),
            amount_minor_units: data
                .amount
                .ok_or_else(|| GatewayError::malformed("verify data has no amount"))?,
            transaction_id: transaction_id(data.id.as_ref()),
            raw,
        })
    }
}
