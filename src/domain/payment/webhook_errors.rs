//! Webhook error types for Paystack webhook handling.
//!
//! Every failure of the reconciler maps to exactly one HTTP status. Paystack
//! retries on non-2xx, so "rejected but understood" outcomes are 200.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::OrderId;

/// Errors that occur during webhook processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No `x-paystack-signature` header.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature does not match the body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body is not the expected JSON shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field is present but unusable.
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// No order matches the event reference.
    #[error("Order not found for reference {0}")]
    OrderNotFound(String),

    /// Charged amount differs from the order total.
    #[error("Amount mismatch for order {order_id}: expected {expected}, received {received}")]
    AmountMismatch {
        order_id: OrderId,
        expected: i64,
        received: i64,
    },

    /// Subscription charge lacks data required to activate.
    #[error("Subscription charge for {overseer_uid} is missing {missing}")]
    IncompleteSubscriptionCharge {
        overseer_uid: String,
        missing: &'static str,
    },

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if a redelivery could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// True for events that were understood and deliberately not applied.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            WebhookError::AmountMismatch { .. } | WebhookError::IncompleteSubscriptionCharge { .. }
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::MalformedPayload(_)
            | WebhookError::MissingField(_)
            | WebhookError::InvalidField { .. } => StatusCode::BAD_REQUEST,

            WebhookError::OrderNotFound(_) => StatusCode::NOT_FOUND,

            // Acknowledged so the gateway stops redelivering
            WebhookError::AmountMismatch { .. } | WebhookError::IncompleteSubscriptionCharge { .. } => {
                StatusCode::OK
            }

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            WebhookError::MissingField(_) => "MISSING_FIELD",
            WebhookError::InvalidField { .. } => "INVALID_FIELD",
            WebhookError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            WebhookError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            WebhookError::IncompleteSubscriptionCharge { .. } => "INCOMPLETE_SUBSCRIPTION_CHARGE",
            WebhookError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<crate::domain::foundation::DomainError> for WebhookError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}
