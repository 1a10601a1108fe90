//! Order payment state and charge assessment.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{OrderId, Timestamp, ValidationError};

/// Status text written when an order is settled.
pub const PAID_STATUS: &str = "paid";

/// An order as the payment flow sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub total_amount: Decimal,
    pub is_paid: bool,
    pub status: String,
    pub transaction_id: Option<String>,
    pub gateway_payload: Option<Value>,
    pub paid_at: Option<Timestamp>,
}

/// Decision for an incoming charge against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeAssessment {
    Settle,
    AlreadyPaid,
    AmountMismatch { expected: i64, received: i64 },
}

impl Order {
    /// `round(total_amount * 100)` as integer minor units.
    pub fn expected_minor_units(&self) -> Result<i64, ValidationError> {
        to_minor_units(self.total_amount, "total_amount")
    }

    /// Compares a charged amount against the order.
    ///
    /// Paid orders are never re-settled, whatever the amount.
    pub fn assess_charge(&self, amount_minor_units: i64) -> Result<ChargeAssessment, ValidationError> {
        if self.is_paid {
            return Ok(ChargeAssessment::AlreadyPaid);
        }
        let expected = self.expected_minor_units()?;
        if expected == amount_minor_units {
            Ok(ChargeAssessment::Settle)
        } else {
            Ok(ChargeAssessment::AmountMismatch {
                expected,
                received: amount_minor_units,
            })
        }
    }
}

/// Converts a major-unit amount to minor units with banker's rounding.
pub fn to_minor_units(amount: Decimal, field: &str) -> Result<i64, ValidationError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| ValidationError::invalid_format(field, "amount out of range"))
}

/// Everything written when an order is marked paid.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfirmation {
    pub transaction_id: String,
    pub gateway_payload: Value,
    pub paid_at: Timestamp,
}

/// Result of the guarded paid-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPaidOutcome {
    Marked,
    AlreadyPaid,
    NotFound,
}
