//! ReconcilePaymentWebhookHandler - Applies verified Paystack events.
//!
//! Pipeline: verify signature over the raw body, parse the envelope,
//! classify, then apply exactly one state change. Nothing is parsed before
//! the signature checks out, and nothing is written unless classification
//! produced a complete, consistent charge.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::foundation::{OrderId, Timestamp, UserUid};
use crate::domain::payment::{
    classify, ChargeAssessment, ClassifiedEvent, MarkPaidOutcome, OrderCharge, PaymentConfirmation,
    PaystackEvent, PaystackSignatureVerifier, SubscriptionActivation, WebhookError,
};
use crate::ports::{OrderRepository, SubscriptionRepository};

/// A raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    /// Request body exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `x-paystack-signature` header.
    pub signature: Option<String>,
}

/// What an accepted delivery did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    SubscriptionActivated { overseer_uid: UserUid },
    /// Marked as subscription but carried no overseer.
    SubscriptionChargeSkipped,
    OrderPaid { order_id: OrderId },
    /// Redelivery of a charge that already settled the order.
    OrderAlreadyPaid { order_id: OrderId },
    SubscriptionPaymentFailed { overseer_uid: UserUid, recorded: bool },
    FailureAcknowledged,
    Ignored { event_type: String },
}

impl WebhookOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::SubscriptionActivated { .. } => "Subscription activated",
            Self::SubscriptionChargeSkipped => "Not a valid subscription charge",
            Self::OrderPaid { .. } => "Order marked as paid",
            Self::OrderAlreadyPaid { .. } => "Order already paid",
            Self::SubscriptionPaymentFailed { .. } => "Subscription payment failure recorded",
            Self::FailureAcknowledged => "Charge failure acknowledged",
            Self::Ignored { .. } => "Event ignored",
        }
    }
}

pub struct ReconcilePaymentWebhookHandler {
    verifier: PaystackSignatureVerifier,
    subscriptions: Arc<dyn SubscriptionRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl ReconcilePaymentWebhookHandler {
    pub fn new(
        verifier: PaystackSignatureVerifier,
        subscriptions: Arc<dyn SubscriptionRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            verifier,
            subscriptions,
            orders,
        }
    }

    pub async fn handle(&self, cmd: ReconcileWebhookCommand) -> Result<WebhookOutcome, WebhookError> {
        if let Err(err) = self.verifier.verify(&cmd.payload, cmd.signature.as_deref()) {
            warn!(error = %err, body_len = cmd.payload.len(), "Webhook signature rejected");
            return Err(err);
        }

        let event = PaystackEvent::parse(&cmd.payload).map_err(|err| {
            warn!(error = %err, "Webhook payload malformed");
            err
        })?;
        let event_type = event.event_type.to_string();

        let classified = classify(&event).map_err(|err| {
            if err.is_rejection() {
                warn!(event = %event_type, error = %err, "Webhook charge rejected");
            } else {
                warn!(event = %event_type, error = %err, "Webhook payload invalid");
            }
            err
        })?;

        let outcome = self.apply(classified).await?;
        info!(event = %event_type, outcome = ?outcome, "Webhook processed");
        Ok(outcome)
    }

    async fn apply(&self, event: ClassifiedEvent) -> Result<WebhookOutcome, WebhookError> {
        match event {
            ClassifiedEvent::SubscriptionCharged(charge) => {
                let activation = SubscriptionActivation::from_charge(&charge, Timestamp::now());
                self.subscriptions.upsert_activation(&activation).await.map_err(|e| {
                    error!(overseer_uid = %charge.overseer_uid, error = %e, "Subscription upsert failed");
                    WebhookError::from(e)
                })?;
                Ok(WebhookOutcome::SubscriptionActivated {
                    overseer_uid: charge.overseer_uid,
                })
            }
            ClassifiedEvent::SubscriptionChargeWithoutOverseer => Ok(WebhookOutcome::SubscriptionChargeSkipped),
            ClassifiedEvent::OrderCharged(charge) => self.settle_order(charge).await,
            ClassifiedEvent::SubscriptionChargeFailed { overseer_uid } => {
                let recorded = self
                    .subscriptions
                    .record_payment_failure(&overseer_uid, Timestamp::now())
                    .await?;
                if !recorded {
                    warn!(overseer_uid = %overseer_uid, "Charge failure for overseer without subscription");
                }
                Ok(WebhookOutcome::SubscriptionPaymentFailed { overseer_uid, recorded })
            }
            ClassifiedEvent::ChargeFailedWithoutOverseer => Ok(WebhookOutcome::FailureAcknowledged),
            ClassifiedEvent::Ignored { event_type } => Ok(WebhookOutcome::Ignored { event_type }),
        }
    }

    async fn settle_order(&self, charge: OrderCharge) -> Result<WebhookOutcome, WebhookError> {
        // Order ids are UUIDs; any other reference cannot match an order.
        let order_id: OrderId = charge
            .reference
            .parse()
            .map_err(|_| WebhookError::OrderNotFound(charge.reference.clone()))?;

        let order = self
            .orders
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| WebhookError::OrderNotFound(charge.reference.clone()))?;

        let assessment = order
            .assess_charge(charge.amount_minor_units)
            .map_err(|e| WebhookError::Database(format!("stored order total unusable: {}", e)))?;

        match assessment {
            ChargeAssessment::AlreadyPaid => Ok(WebhookOutcome::OrderAlreadyPaid { order_id }),
            ChargeAssessment::AmountMismatch { expected, received } => {
                error!(
                    alert = "payment_amount_mismatch",
                    order_id = %order_id,
                    expected,
                    received,
                    transaction_id = %charge.transaction_id,
                    "Charged amount does not match order total"
                );
                Err(WebhookError::AmountMismatch {
                    order_id,
                    expected,
                    received,
                })
            }
            ChargeAssessment::Settle => {
                let confirmation = PaymentConfirmation {
                    transaction_id: charge.transaction_id,
                    gateway_payload: charge.payload,
                    paid_at: Timestamp::now(),
                };
                match self.orders.mark_paid(&order_id, &confirmation).await? {
                    MarkPaidOutcome::Marked => Ok(WebhookOutcome::OrderPaid { order_id }),
                    MarkPaidOutcome::AlreadyPaid => Ok(WebhookOutcome::OrderAlreadyPaid { order_id }),
                    MarkPaidOutcome::NotFound => Err(WebhookError::OrderNotFound(charge.reference)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::in_memory::{InMemoryOrderRepository, InMemorySubscriptionRepository};
    use crate::domain::payment::{sign_payload, Order, SubscriptionStatus};
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use serde_json::{json, Value};

    const SECRET: &str = "sk_test_webhook_secret";

    struct Fixture {
        handler: ReconcilePaymentWebhookHandler,
        subscriptions: InMemorySubscriptionRepository,
        orders: InMemoryOrderRepository,
    }

    fn fixture() -> Fixture {
        let subscriptions = InMemorySubscriptionRepository::new();
        let orders = InMemoryOrderRepository::new();
        let handler = ReconcilePaymentWebhookHandler::new(
            PaystackSignatureVerifier::new(SecretString::new(SECRET.into())),
            Arc::new(subscriptions.clone()),
            Arc::new(orders.clone()),
        );
        Fixture {
            handler,
            subscriptions,
            orders,
        }
    }

    fn signed(body: &Value) -> ReconcileWebhookCommand {
        let payload = serde_json::to_vec(body).unwrap();
        let signature = sign_payload(SECRET, &payload);
        ReconcileWebhookCommand {
            payload,
            signature: Some(signature),
        }
    }

    fn subscription_event(uid: Option<&str>, members: &str) -> Value {
        let mut fields = vec![json!({"variable_name": "subscription_type", "value": "monthly_overseer_tier"})];
        if let Some(uid) = uid {
            fields.push(json!({"variable_name": "overseer_uid", "value": uid}));
        }
        fields.push(json!({"variable_name": "member_count", "value": members}));
        json!({
            "event": "charge.success",
            "data": {
                "id": 501,
                "status": "success",
                "reference": "SUB_ov-1_1700000000",
                "amount": 15000,
                "authorization": {"authorization_code": "AUTH_abc"},
                "customer": {"email": "overseer@example.com"},
                "metadata": {"custom_fields": fields}
            }
        })
    }

    fn order_event(reference: &str, amount: i64) -> Value {
        json!({
            "event": "charge.success",
            "data": {
                "id": 9001,
                "status": "success",
                "reference": reference,
                "amount": amount,
                "metadata": null
            }
        })
    }

    async fn seed_order(orders: &InMemoryOrderRepository, total: Decimal) -> OrderId {
        let order = Order {
            id: OrderId::new(),
            total_amount: total,
            is_paid: false,
            status: "pending".into(),
            transaction_id: None,
            gateway_payload: None,
            paid_at: None,
        };
        let id = order.id;
        orders.insert(order).await;
        id
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let f = fixture();
        let mut cmd = signed(&subscription_event(Some("ov-1"), "3"));
        cmd.signature = None;
        let err = f.handler.handle(cmd).await.unwrap_err();
        assert_eq!(err, WebhookError::MissingSignature);
        assert_eq!(f.subscriptions.write_count(), 0);
    }

    #[tokio::test]
    async fn invalid_json_with_valid_signature_is_bad_request() {
        let f = fixture();
        let payload = b"{not json".to_vec();
        let cmd = ReconcileWebhookCommand {
            signature: Some(sign_payload(SECRET, &payload)),
            payload,
        };
        let err = f.handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Subscriptions
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn subscription_charge_activates() {
        let f = fixture();
        let outcome = f.handler.handle(signed(&subscription_event(Some("ov-1"), "4"))).await.unwrap();
        let uid = UserUid::new("ov-1").unwrap();
        assert_eq!(outcome, WebhookOutcome::SubscriptionActivated { overseer_uid: uid.clone() });

        let state = f.subscriptions.find(&uid).await.unwrap().unwrap();
        assert_eq!(state.status, SubscriptionStatus::Active);
        assert_eq!(state.auth_code.as_deref(), Some("AUTH_abc"));
        assert_eq!(state.member_count, 4);
        assert_eq!(state.last_charged_amount, Some(Decimal::new(15000, 2)));
    }

    #[tokio::test]
    async fn renewal_without_member_count_activates_with_zero_members() {
        let f = fixture();
        let mut event = subscription_event(Some("ov-1"), "4");
        event["data"]["metadata"]["custom_fields"]
            .as_array_mut()
            .unwrap()
            .retain(|field| field["variable_name"] != "member_count");

        let outcome = f.handler.handle(signed(&event)).await.unwrap();

        let uid = UserUid::new("ov-1").unwrap();
        assert_eq!(outcome, WebhookOutcome::SubscriptionActivated { overseer_uid: uid.clone() });
        let state = f.subscriptions.find(&uid).await.unwrap().unwrap();
        assert_eq!(state.status, SubscriptionStatus::Active);
        assert_eq!(state.member_count, 0);
        assert_eq!(state.auth_code.as_deref(), Some("AUTH_abc"));
    }

    #[tokio::test]
    async fn subscription_charge_without_overseer_is_skipped() {
        let f = fixture();
        let outcome = f.handler.handle(signed(&subscription_event(None, "4"))).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::SubscriptionChargeSkipped);
        assert_eq!(f.subscriptions.row_count().await, 0);
    }

    #[tokio::test]
    async fn subscription_charge_without_authorization_writes_nothing() {
        let f = fixture();
        let mut event = subscription_event(Some("ov-1"), "4");
        event["data"]["authorization"] = Value::Null;
        let err = f.handler.handle(signed(&event)).await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.status_code(), StatusCode::OK);
        assert_eq!(f.subscriptions.write_count(), 0);
    }

    #[tokio::test]
    async fn charge_failure_marks_existing_subscription() {
        let f = fixture();
        f.handler.handle(signed(&subscription_event(Some("ov-1"), "2"))).await.unwrap();
        let failure = json!({
            "event": "charge.failure",
            "data": {"status": "failed", "metadata": {"custom_fields": [
                {"variable_name": "overseer_uid", "value": "ov-1"}
            ]}}
        });
        let outcome = f.handler.handle(signed(&failure)).await.unwrap();
        assert!(matches!(outcome, WebhookOutcome::SubscriptionPaymentFailed { recorded: true, .. }));
        let state = f.subscriptions.find(&UserUid::new("ov-1").unwrap()).await.unwrap().unwrap();
        assert_eq!(state.status, SubscriptionStatus::PaymentFailed);
        assert!(state.last_attempted_at.is_some());
    }

    #[tokio::test]
    async fn database_failure_is_retryable_500() {
        let f = fixture();
        f.subscriptions.fail_writes(true);
        let err = f.handler.handle(signed(&subscription_event(Some("ov-1"), "2"))).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Orders
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn exact_amount_marks_order_paid() {
        let f = fixture();
        let id = seed_order(&f.orders, Decimal::new(10000, 2)).await;
        let outcome = f.handler.handle(signed(&order_event(&id.to_string(), 10000))).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::OrderPaid { order_id: id });

        let order = f.orders.get(&id).await.unwrap();
        assert!(order.is_paid);
        assert_eq!(order.status, "paid");
        assert_eq!(order.transaction_id.as_deref(), Some("9001"));
        assert_eq!(order.gateway_payload.unwrap()["amount"], 10000);
    }

    #[tokio::test]
    async fn short_amount_is_rejected_and_order_stays_unpaid() {
        let f = fixture();
        let id = seed_order(&f.orders, Decimal::new(10000, 2)).await;
        let err = f.handler.handle(signed(&order_event(&id.to_string(), 9999))).await.unwrap_err();
        assert_eq!(
            err,
            WebhookError::AmountMismatch {
                order_id: id,
                expected: 10000,
                received: 9999
            }
        );
        assert!(!f.orders.get(&id).await.unwrap().is_paid);
        assert_eq!(f.orders.write_count(), 0);
    }

    #[tokio::test]
    async fn unknown_and_non_uuid_references_are_not_found() {
        let f = fixture();
        let err = f.handler.handle(signed(&order_event(&OrderId::new().to_string(), 100))).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let err = f.handler.handle(signed(&order_event("ORD-42", 100))).await.unwrap_err();
        assert_eq!(err, WebhookError::OrderNotFound("ORD-42".into()));
    }

    #[tokio::test]
    async fn redelivery_does_not_resettle() {
        let f = fixture();
        let id = seed_order(&f.orders, Decimal::new(10000, 2)).await;
        let cmd = signed(&order_event(&id.to_string(), 10000));
        f.handler.handle(cmd.clone()).await.unwrap();
        let second = f.handler.handle(cmd).await.unwrap();
        assert_eq!(second, WebhookOutcome::OrderAlreadyPaid { order_id: id });
        assert_eq!(f.orders.write_count(), 1);
    }

    #[tokio::test]
    async fn unrelated_events_are_ignored() {
        let f = fixture();
        let outcome = f
            .handler
            .handle(signed(&json!({"event": "transfer.success", "data": {}})))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored { event_type: "transfer.success".into() });
        assert_eq!(f.subscriptions.write_count() + f.orders.write_count(), 0);
    }
}
