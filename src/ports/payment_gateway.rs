//! Payment Gateway Port - Outbound calls to the card processor.
//!
//! Covers the three server-initiated operations the backend performs:
//! creating hosted checkout sessions (plain, subscription or split),
//! registering seller subaccounts, and verifying a transaction by reference.
//! Inbound webhooks are not part of this port; they are verified and
//! classified in `domain::payment`.

use async_trait::async_trait;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use crate::domain::payment::{CustomField, SubaccountShare};

/// Port for the hosted payment gateway.
///
/// # Contract
///
/// Implementations must:
/// - Send amounts exactly as given (minor units, no conversion)
/// - Relay the gateway's own message on a rejected request
/// - Never log the secret key
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a hosted checkout session.
    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<TransactionAuthorization, GatewayError>;

    /// Registers a seller's settlement account.
    async fn create_subaccount(
        &self,
        request: CreateSubaccountRequest,
    ) -> Result<Subaccount, GatewayError>;

    /// Looks up the current state of a transaction.
    async fn verify_transaction(&self, reference: &str)
        -> Result<TransactionVerification, GatewayError>;
}

/// Request to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct InitializeTransactionRequest {
    /// Customer email shown on the checkout page.
    pub email: String,

    /// Amount in minor units. Zero when a plan sets the amount.
    pub amount_minor_units: i64,

    /// ISO currency code.
    pub currency: String,

    /// Our reference; echoed back in webhooks.
    pub reference: String,

    /// Recurring plan code, for subscriptions.
    pub plan: Option<String>,

    /// Where the hosted page redirects after payment.
    pub callback_url: Option<String>,

    /// Allowed payment channels. Empty means the gateway default.
    pub channels: Vec<String>,

    /// Metadata custom fields, echoed back in webhooks.
    pub custom_fields: Vec<CustomField>,

    /// Flat split across seller subaccounts.
    pub split: Option<Vec<SubaccountShare>>,
}

impl InitializeTransactionRequest {
    /// A plain request with only the required fields set.
    pub fn new(email: impl Into<String>, amount_minor_units: i64, currency: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            amount_minor_units,
            currency: currency.into(),
            reference: reference.into(),
            plan: None,
            callback_url: None,
            channels: Vec::new(),
            custom_fields: Vec::new(),
            split: None,
        }
    }
}

/// Hosted checkout session returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionAuthorization {
    pub authorization_url: String,
    pub access_code: Option<String>,
    pub reference: String,
}

/// Request to register a seller subaccount.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubaccountRequest {
    pub business_name: String,
    /// Gateway bank code (settlement bank).
    pub bank_code: String,
    pub account_number: String,
    /// Platform's cut of each split, in percent.
    pub percentage_charge: Decimal,
    pub primary_contact_email: String,
}

/// A registered subaccount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subaccount {
    pub subaccount_code: String,
}

/// Gateway view of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionVerification {
    pub reference: String,
    /// Gateway status text; `"success"` when settled.
    pub status: String,
    pub amount_minor_units: i64,
    pub transaction_id: Option<String>,
    /// Full `data` object, stored with the order when it settles.
    pub raw: Value,
}

impl TransactionVerification {
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }
}

/// Errors from the payment gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The gateway understood and refused the request.
    #[error("{0}")]
    Rejected(String),

    /// Connection or timeout failure.
    #[error("Payment gateway unreachable: {0}")]
    Network(String),

    /// The gateway answered with something we could not read.
    #[error("Unexpected payment gateway response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Whether a retry could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Rejections are the caller's fault; everything else is ours.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::Network(_) | Self::MalformedResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "GATEWAY_REJECTED",
            Self::Network(_) => "GATEWAY_UNAVAILABLE",
            Self::MalformedResponse(_) => "GATEWAY_BAD_RESPONSE",
        }
    }
}
