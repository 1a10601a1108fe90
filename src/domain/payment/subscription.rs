//! Overseer subscription state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SubscriptionCharge;
use crate::domain::foundation::{Timestamp, UserUid, ValidationError};

/// Days between a successful charge and the next one.
pub const BILLING_PERIOD_DAYS: i64 = 30;

/// Subscription lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Inactive,
    Active,
    PaymentFailed,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::PaymentFailed => "payment_failed",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            "payment_failed" => Ok(Self::PaymentFailed),
            other => Err(ValidationError::invalid_format(
                "subscription_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// The full set of values written by a successful subscription charge.
///
/// Applying the same activation twice yields the same state: every field is
/// assigned, nothing is incremented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionActivation {
    pub overseer_uid: UserUid,
    pub auth_code: String,
    pub email: String,
    pub charged_at: Timestamp,
    pub charged_amount: Decimal,
    pub member_count: u32,
    pub next_charge_date: Timestamp,
}

impl SubscriptionActivation {
    pub fn from_charge(charge: &SubscriptionCharge, now: Timestamp) -> Self {
        Self {
            overseer_uid: charge.overseer_uid.clone(),
            auth_code: charge.authorization_code.clone(),
            email: charge.customer_email.clone(),
            charged_at: now,
            charged_amount: Decimal::new(charge.amount_minor_units, 2),
            member_count: charge.member_count,
            next_charge_date: now.add_days(BILLING_PERIOD_DAYS),
        }
    }
}

/// Subscription columns of an overseer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionState {
    pub overseer_uid: UserUid,
    pub auth_code: Option<String>,
    pub email: Option<String>,
    pub status: SubscriptionStatus,
    pub last_charged_at: Option<Timestamp>,
    pub last_charged_amount: Option<Decimal>,
    pub member_count: u32,
    pub next_charge_date: Option<Timestamp>,
    pub last_attempted_at: Option<Timestamp>,
}

impl SubscriptionState {
    pub fn inactive(overseer_uid: UserUid) -> Self {
        Self {
            overseer_uid,
            auth_code: None,
            email: None,
            status: SubscriptionStatus::Inactive,
            last_charged_at: None,
            last_charged_amount: None,
            member_count: 0,
            next_charge_date: None,
            last_attempted_at: None,
        }
    }

    pub fn apply_activation(&mut self, activation: &SubscriptionActivation) {
        self.auth_code = Some(activation.auth_code.clone());
        self.email = Some(activation.email.clone());
        self.status = SubscriptionStatus::Active;
        self.last_charged_at = Some(activation.charged_at);
        self.last_charged_amount = Some(activation.charged_amount);
        self.member_count = activation.member_count;
        self.next_charge_date = Some(activation.next_charge_date);
    }

    pub fn apply_payment_failure(&mut self, attempted_at: Timestamp) {
        self.status = SubscriptionStatus::PaymentFailed;
        self.last_attempted_at = Some(attempted_at);
    }
}
