//! Paystack REST wire types.
//!
//! Every Paystack response uses the same `{status, message, data}` envelope;
//! `status: false` carries a human-readable refusal in `message`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::payment::{CustomField, SubaccountShare};
use crate::ports::GatewayError;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps `data`, turning `status: false` into a relayed rejection.
    pub fn into_data(self) -> Result<T, GatewayError> {
        if !self.status {
            return Err(GatewayError::Rejected(
                self.message.unwrap_or_else(|| "Paystack API error".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| GatewayError::malformed("response has no data"))
    }
}

/// Refusal body on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiRefusal {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InitializeBody<'a> {
    pub email: &'a str,
    /// Paystack accepts the amount as a string of minor units.
    pub amount: String,
    pub currency: &'a str,
    pub reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub channels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitBody<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MetadataBody<'a> {
    pub custom_fields: &'a [CustomField],
}

#[derive(Debug, Serialize)]
pub(crate) struct SplitBody<'a> {
    #[serde(rename = "type")]
    pub split_type: &'static str,
    pub subaccounts: &'a [SubaccountShare],
}

#[derive(Debug, Deserialize)]
pub(crate) struct InitializeData {
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubaccountBody<'a> {
    pub business_name: &'a str,
    pub settlement_bank: &'a str,
    pub account_number: &'a str,
    pub percentage_charge: f64,
    pub primary_contact_email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubaccountData {
    pub subaccount_code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyData {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
}
