//! Transaction metadata custom fields.
//!
//! Paystack echoes back the `metadata.custom_fields` list we send at
//! transaction initialization. Inbound, the list is parsed once into
//! [`ChargeMetadata`]; outbound, [`CustomField`] builds it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker for subscription charges in `subscription_type`.
pub const SUBSCRIPTION_MARKER: &str = "monthly_overseer_tier";

/// One `{display_name, variable_name, value}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub display_name: String,
    pub variable_name: String,
    pub value: String,
}

impl CustomField {
    pub fn new(display_name: &str, variable_name: &str, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.to_string(),
            variable_name: variable_name.to_string(),
            value: value.into(),
        }
    }
}

/// Known custom fields of an inbound charge.
///
/// Blank values count as absent. The first entry for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeMetadata {
    pub subscription_type: Option<String>,
    pub overseer_uid: Option<String>,
    pub plan_code: Option<String>,
    /// Raw text; validated when a subscription charge needs it.
    pub member_count: Option<String>,
}

impl ChargeMetadata {
    /// Reads the metadata value of a charge.
    ///
    /// Accepts an object with `custom_fields`, a JSON-encoded string of such
    /// an object, or null/empty string (Paystack sends all three).
    pub fn from_value(metadata: &Value) -> Self {
        match metadata {
            Value::Object(_) => Self::from_object(metadata),
            Value::String(s) if !s.trim().is_empty() => match serde_json::from_str::<Value>(s) {
                Ok(inner @ Value::Object(_)) => Self::from_object(&inner),
                _ => Self::default(),
            },
            _ => Self::default(),
        }
    }

    fn from_object(metadata: &Value) -> Self {
        let mut parsed = Self::default();
        let Some(fields) = metadata.get("custom_fields").and_then(Value::as_array) else {
            return parsed;
        };

        for field in fields {
            let Some(name) = field.get("variable_name").and_then(Value::as_str) else {
                continue;
            };
            let Some(value) = field.get("value").and_then(scalar_to_string) else {
                continue;
            };
            let slot = match name {
                "subscription_type" => &mut parsed.subscription_type,
                "overseer_uid" => &mut parsed.overseer_uid,
                "plan_code" => &mut parsed.plan_code,
                "member_count" => &mut parsed.member_count,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        parsed
    }

    pub fn is_subscription(&self) -> bool {
        self.subscription_type.as_deref() == Some(SUBSCRIPTION_MARKER)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Custom fields sent with a subscription initialization.
pub fn subscription_custom_fields(overseer_uid: &str, plan_code: &str, member_count: u32) -> Vec<CustomField> {
    vec![
        CustomField::new("Subscription Type", "subscription_type", SUBSCRIPTION_MARKER),
        CustomField::new("Overseer UID", "overseer_uid", overseer_uid),
        CustomField::new("Plan Code", "plan_code", plan_code),
        CustomField::new("Member Count", "member_count", member_count.to_string()),
    ]
}
