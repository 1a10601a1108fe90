//! HTTP DTOs for payment endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::WebhookOutcome;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::{LineItem, Order, WebhookError};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to open a subscription checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeSubscriptionRequest {
    pub email: String,
    /// Overseer paying for the plan.
    pub uid: String,
    pub plan_code: String,
    pub member_count: u32,
}

/// Request to register a seller's settlement account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubaccountRequest {
    pub uid: String,
    pub business_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub contact_email: String,
}

/// Request for a split checkout link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentLinkRequest {
    pub email: String,
    pub products: Vec<LineItem>,
    pub order_reference: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of every 200 answer to a webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    /// `processed` or `rejected`.
    pub status: &'static str,
    pub message: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WebhookOutcome>,
    /// Rejection code; absent when processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl WebhookAckResponse {
    pub fn processed(outcome: WebhookOutcome) -> Self {
        Self {
            status: "processed",
            message: outcome.message().to_string(),
            outcome: Some(outcome),
            code: None,
        }
    }

    /// Understood but not applied; acknowledged so it is not redelivered.
    pub fn rejected(err: &WebhookError) -> Self {
        Self {
            status: "rejected",
            message: err.to_string(),
            outcome: None,
            code: Some(err.code()),
        }
    }
}

/// Payment view of an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPaymentResponse {
    pub id: String,
    pub total_amount: Decimal,
    pub is_paid: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,
}

impl From<Order> for OrderPaymentResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            total_amount: order.total_amount,
            is_paid: order.is_paid,
            status: order.status,
            transaction_id: order.transaction_id,
            paid_at: order.paid_at,
        }
    }
}
