//! Split checkout arithmetic and subscription references.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::to_minor_units;
use crate::domain::foundation::{Timestamp, UserUid, ValidationError};

/// Payment channels offered on checkout links.
pub const CHECKOUT_CHANNELS: [&str; 5] = ["card", "bank", "ussd", "qr", "mobile_money"];

/// One product line of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub price: Decimal,
    pub quantity: u32,
    /// Seller subaccount receiving this line's proceeds; `None` keeps it all
    /// with the platform.
    #[serde(default)]
    pub subaccount: Option<String>,
}

impl LineItem {
    /// `round(price * quantity * 100)`.
    pub fn total_minor_units(&self) -> Result<i64, ValidationError> {
        to_minor_units(self.price * Decimal::from(self.quantity), "price")
    }
}

/// A seller's share of a split transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubaccountShare {
    pub subaccount: String,
    pub share: i64,
}

/// Full amount plus flat per-subaccount shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub total_minor_units: i64,
    pub shares: Vec<SubaccountShare>,
}

/// Computes the transaction amount and each seller's share.
///
/// Each line contributes `round(line_total * (1 - fee/100))` to its
/// subaccount; lines for the same subaccount are summed in first-seen order.
pub fn plan_split(items: &[LineItem], platform_fee_percent: Decimal) -> Result<SplitPlan, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::empty_field("products"));
    }
    if platform_fee_percent < Decimal::ZERO || platform_fee_percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::invalid_format(
            "platform_fee_percent",
            format!("must be within 0..=100, got {}", platform_fee_percent),
        ));
    }
    let seller_ratio = Decimal::ONE - platform_fee_percent / Decimal::ONE_HUNDRED;

    let mut total_minor_units: i64 = 0;
    let mut shares: Vec<SubaccountShare> = Vec::new();

    for item in items {
        if item.price < Decimal::ZERO {
            return Err(ValidationError::invalid_format("price", "must not be negative"));
        }
        if item.quantity == 0 {
            return Err(ValidationError::out_of_range("quantity", 1, i64::from(u32::MAX), 0));
        }
        let line_total = item.total_minor_units()?;
        total_minor_units = total_minor_units
            .checked_add(line_total)
            .ok_or_else(|| ValidationError::invalid_format("products", "total overflows"))?;

        let Some(subaccount) = item.subaccount.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let share = (Decimal::from(line_total) * seller_ratio)
            .round()
            .to_i64()
            .ok_or_else(|| ValidationError::invalid_format("price", "share out of range"))?;
        match shares.iter_mut().find(|s| s.subaccount == subaccount) {
            Some(existing) => existing.share += share,
            None => shares.push(SubaccountShare {
                subaccount: subaccount.to_string(),
                share,
            }),
        }
    }

    shares.retain(|s| s.share > 0);
    Ok(SplitPlan {
        total_minor_units,
        shares,
    })
}

/// Reference for a subscription initialization: `SUB_{uid}_{unix_ts}`.
pub fn subscription_reference(overseer_uid: &UserUid, now: Timestamp) -> String {
    format!("SUB_{}_{}", overseer_uid, now.as_unix_secs())
}
