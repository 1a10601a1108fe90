//! Inbound Paystack events and their classification.
//!
//! The raw body is parsed once into a [`PaystackEvent`]; [`classify`] then
//! turns it into a [`ClassifiedEvent`] carrying exactly the fields each
//! branch needs. Missing required fields are rejected here rather than
//! defaulted further down.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use super::{ChargeMetadata, WebhookError};
use crate::domain::foundation::UserUid;

/// Event types the reconciler reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaystackEventType {
    ChargeSuccess,
    ChargeFailure,
    Other(String),
}

impl PaystackEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "charge.success" => Self::ChargeSuccess,
            "charge.failure" => Self::ChargeFailure,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ChargeSuccess => "charge.success",
            Self::ChargeFailure => "charge.failure",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for PaystackEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope of a webhook delivery.
#[derive(Debug, Clone)]
pub struct PaystackEvent {
    pub event_type: PaystackEventType,
    /// Untyped `data`; typed lazily so unrelated events never fail parsing.
    pub data: Value,
}

#[derive(Deserialize)]
struct Envelope {
    event: Option<String>,
    #[serde(default)]
    data: Value,
}

impl PaystackEvent {
    /// Parses a verified body.
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        let envelope: Envelope = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;
        let event = envelope
            .event
            .filter(|e| !e.trim().is_empty())
            .ok_or(WebhookError::MissingField("event"))?;
        Ok(Self {
            event_type: PaystackEventType::parse(event.trim()),
            data: envelope.data,
        })
    }

    /// Types `data` as a charge.
    pub fn charge_data(&self) -> Result<ChargeData, WebhookError> {
        if !self.data.is_object() {
            return Err(WebhookError::MissingField("data"));
        }
        serde_json::from_value(self.data.clone())
            .map_err(|e| WebhookError::MalformedPayload(format!("data: {}", e)))
    }
}

/// The `data` object of a charge event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargeData {
    /// Gateway transaction id; numeric in practice.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    /// Minor units (cents).
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub authorization: Option<Authorization>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorization {
    #[serde(default)]
    pub authorization_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub email: Option<String>,
}

impl ChargeData {
    pub fn transaction_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    fn authorization_code(&self) -> Option<String> {
        non_blank(self.authorization.as_ref()?.authorization_code.as_deref())
    }

    fn customer_email(&self) -> Option<String> {
        non_blank(self.customer.as_ref()?.email.as_deref())
    }

    fn is_successful(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// A successful subscription charge with everything needed to activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCharge {
    pub overseer_uid: UserUid,
    pub authorization_code: String,
    pub customer_email: String,
    pub amount_minor_units: i64,
    pub member_count: u32,
    pub plan_code: Option<String>,
}

/// A successful one-off charge against an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCharge {
    pub reference: String,
    pub amount_minor_units: i64,
    pub transaction_id: String,
    /// The full `data` object, stored alongside the paid order.
    pub payload: Value,
}

/// What a verified event means for our state.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    SubscriptionCharged(SubscriptionCharge),
    /// Marked as subscription but no overseer; not a valid subscription charge.
    SubscriptionChargeWithoutOverseer,
    OrderCharged(OrderCharge),
    SubscriptionChargeFailed { overseer_uid: UserUid },
    ChargeFailedWithoutOverseer,
    Ignored { event_type: String },
}

/// Classifies a verified event.
pub fn classify(event: &PaystackEvent) -> Result<ClassifiedEvent, WebhookError> {
    match &event.event_type {
        PaystackEventType::ChargeSuccess => {
            let data = event.charge_data()?;
            if !data.is_successful() {
                return Ok(ClassifiedEvent::Ignored {
                    event_type: format!("{} ({})", event.event_type, data.status.as_deref().unwrap_or("no status")),
                });
            }
            let metadata = ChargeMetadata::from_value(&data.metadata);
            if metadata.is_subscription() {
                classify_subscription_charge(&data, metadata)
            } else {
                classify_order_charge(&data, &event.data)
            }
        }
        PaystackEventType::ChargeFailure => {
            let data = event.charge_data()?;
            let metadata = ChargeMetadata::from_value(&data.metadata);
            match metadata.overseer_uid.map(UserUid::new) {
                Some(Ok(overseer_uid)) => Ok(ClassifiedEvent::SubscriptionChargeFailed { overseer_uid }),
                _ => Ok(ClassifiedEvent::ChargeFailedWithoutOverseer),
            }
        }
        PaystackEventType::Other(event_type) => Ok(ClassifiedEvent::Ignored {
            event_type: event_type.clone(),
        }),
    }
}

fn classify_subscription_charge(
    data: &ChargeData,
    metadata: ChargeMetadata,
) -> Result<ClassifiedEvent, WebhookError> {
    let overseer_uid = match metadata.overseer_uid.map(UserUid::new) {
        Some(Ok(uid)) => uid,
        _ => return Ok(ClassifiedEvent::SubscriptionChargeWithoutOverseer),
    };
    let incomplete = |missing: &'static str| WebhookError::IncompleteSubscriptionCharge {
        overseer_uid: overseer_uid.to_string(),
        missing,
    };

    let authorization_code = data.authorization_code().ok_or_else(|| incomplete("authorization_code"))?;
    let customer_email = data.customer_email().ok_or_else(|| incomplete("customer_email"))?;
    // Plan renewals do not always echo the member count; absent means 0.
    let member_count = match non_blank(metadata.member_count.as_deref()) {
        Some(raw) => raw.parse::<u32>().map_err(|_| WebhookError::InvalidField {
            field: "member_count",
            reason: format!("not a non-negative integer: {}", raw),
        })?,
        None => 0,
    };
    let amount_minor_units = data.amount.ok_or(WebhookError::MissingField("amount"))?;

    Ok(ClassifiedEvent::SubscriptionCharged(SubscriptionCharge {
        overseer_uid,
        authorization_code,
        customer_email,
        amount_minor_units,
        member_count,
        plan_code: metadata.plan_code,
    }))
}

fn classify_order_charge(data: &ChargeData, raw: &Value) -> Result<ClassifiedEvent, WebhookError> {
    let reference = non_blank(data.reference.as_deref()).ok_or(WebhookError::MissingField("reference"))?;
    let amount_minor_units = data.amount.ok_or(WebhookError::MissingField("amount"))?;
    let transaction_id = data.transaction_id().ok_or(WebhookError::MissingField("id"))?;

    Ok(ClassifiedEvent::OrderCharged(OrderCharge {
        reference,
        amount_minor_units,
        transaction_id,
        payload: raw.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(body: Value) -> PaystackEvent {
        PaystackEvent::parse(body.to_string().as_bytes()).unwrap()
    }

    fn subscription_fields(uid: Option<&str>, members: Option<&str>) -> Value {
        let mut fields = vec![json!({"variable_name": "subscription_type", "value": "monthly_overseer_tier"})];
        if let Some(uid) = uid {
            fields.push(json!({"variable_name": "overseer_uid", "value": uid}));
        }
        if let Some(members) = members {
            fields.push(json!({"variable_name": "member_count", "value": members}));
        }
        json!({ "custom_fields": fields })
    }

    // ══════════════════════════════════════════════════════════════
    // Envelope parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn malformed_json_is_rejected() {
        let err = PaystackEvent::parse(b"{not json").unwrap_err();
        assert!(matches!(err, WebhookError::MalformedPayload(_)));
    }

    #[test]
    fn missing_event_name_is_rejected() {
        let err = PaystackEvent::parse(br#"{"data":{}}"#).unwrap_err();
        assert_eq!(err, WebhookError::MissingField("event"));
    }

    #[test]
    fn unknown_event_with_odd_data_is_ignored() {
        let ev = event(json!({"event": "transfer.success", "data": [1, 2, 3]}));
        assert_eq!(
            classify(&ev).unwrap(),
            ClassifiedEvent::Ignored { event_type: "transfer.success".into() }
        );
    }

    #[test]
    fn wrong_typed_charge_data_is_malformed() {
        let ev = event(json!({"event": "charge.success", "data": {"amount": "lots"}}));
        assert!(matches!(classify(&ev), Err(WebhookError::MalformedPayload(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Subscription charges
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn complete_subscription_charge_is_classified() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "success", "amount": 45000, "reference": "SUB_ov-1_1700000000",
            "authorization": {"authorization_code": "AUTH_x"},
            "customer": {"email": "o@example.com"},
            "metadata": subscription_fields(Some("ov-1"), Some("30"))
        }}));

        match classify(&ev).unwrap() {
            ClassifiedEvent::SubscriptionCharged(charge) => {
                assert_eq!(charge.overseer_uid.as_str(), "ov-1");
                assert_eq!(charge.authorization_code, "AUTH_x");
                assert_eq!(charge.amount_minor_units, 45000);
                assert_eq!(charge.member_count, 30);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn subscription_without_overseer_is_noop() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "success", "amount": 100,
            "metadata": subscription_fields(None, Some("3"))
        }}));
        assert_eq!(classify(&ev).unwrap(), ClassifiedEvent::SubscriptionChargeWithoutOverseer);
    }

    #[test]
    fn subscription_without_authorization_is_incomplete() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "success", "amount": 100,
            "customer": {"email": "o@example.com"},
            "metadata": subscription_fields(Some("ov-1"), Some("3"))
        }}));
        assert_eq!(
            classify(&ev).unwrap_err(),
            WebhookError::IncompleteSubscriptionCharge { overseer_uid: "ov-1".into(), missing: "authorization_code" }
        );
    }

    #[test]
    fn subscription_without_email_is_incomplete() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "success", "amount": 100,
            "authorization": {"authorization_code": "AUTH_x"},
            "customer": {"email": ""},
            "metadata": subscription_fields(Some("ov-1"), Some("3"))
        }}));
        assert!(matches!(
            classify(&ev).unwrap_err(),
            WebhookError::IncompleteSubscriptionCharge { missing: "customer_email", .. }
        ));
    }

    #[test]
    fn absent_member_count_defaults_to_zero() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "success", "amount": 15000,
            "authorization": {"authorization_code": "AUTH_x"},
            "customer": {"email": "o@example.com"},
            "metadata": subscription_fields(Some("ov-1"), None)
        }}));
        match classify(&ev).unwrap() {
            ClassifiedEvent::SubscriptionCharged(charge) => assert_eq!(charge.member_count, 0),
            other => panic!("expected subscription charge, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_member_count_is_invalid() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "success", "amount": 100,
            "authorization": {"authorization_code": "AUTH_x"},
            "customer": {"email": "o@example.com"},
            "metadata": subscription_fields(Some("ov-1"), Some("lots"))
        }}));
        assert!(matches!(
            classify(&ev).unwrap_err(),
            WebhookError::InvalidField { field: "member_count", .. }
        ));
    }

    #[test]
    fn non_success_status_is_ignored() {
        let ev = event(json!({"event": "charge.success", "data": {
            "status": "abandoned", "reference": "x", "amount": 1
        }}));
        assert!(matches!(classify(&ev).unwrap(), ClassifiedEvent::Ignored { .. }));
    }

    // ══════════════════════════════════════════════════════════════
    // Order charges
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn order_charge_keeps_raw_data() {
        let data = json!({"id": 302961, "status": "success", "reference": "ord-1", "amount": 10000, "metadata": ""});
        let ev = event(json!({"event": "charge.success", "data": data.clone()}));

        match classify(&ev).unwrap() {
            ClassifiedEvent::OrderCharged(charge) => {
                assert_eq!(charge.reference, "ord-1");
                assert_eq!(charge.transaction_id, "302961");
                assert_eq!(charge.payload, data);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn order_charge_requires_reference_amount_and_id() {
        let no_ref = event(json!({"event": "charge.success", "data": {"id": 1, "status": "success", "amount": 1}}));
        assert_eq!(classify(&no_ref).unwrap_err(), WebhookError::MissingField("reference"));

        let no_amount = event(json!({"event": "charge.success", "data": {"id": 1, "status": "success", "reference": "r"}}));
        assert_eq!(classify(&no_amount).unwrap_err(), WebhookError::MissingField("amount"));

        let no_id = event(json!({"event": "charge.success", "data": {"status": "success", "reference": "r", "amount": 1}}));
        assert_eq!(classify(&no_id).unwrap_err(), WebhookError::MissingField("id"));
    }

    // ══════════════════════════════════════════════════════════════
    // Failures
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn failure_with_overseer_is_classified() {
        let ev = event(json!({"event": "charge.failure", "data": {
            "metadata": {"custom_fields": [{"variable_name": "overseer_uid", "value": "ov-5"}]}
        }}));
        match classify(&ev).unwrap() {
            ClassifiedEvent::SubscriptionChargeFailed { overseer_uid } => assert_eq!(overseer_uid.as_str(), "ov-5"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn failure_without_overseer_is_noop() {
        let ev = event(json!({"event": "charge.failure", "data": {"metadata": null}}));
        assert_eq!(classify(&ev).unwrap(), ClassifiedEvent::ChargeFailedWithoutOverseer);
    }
}
