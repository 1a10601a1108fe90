//! VerifyOrderPaymentHandler - Pulls transaction state for an order.
//!
//! Fallback for deployments where webhooks cannot reach the service. Uses
//! the same exact-amount rule and guarded update as the webhook path.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::CheckoutError;
use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::payment::{ChargeAssessment, MarkPaidOutcome, Order, PaymentConfirmation};
use crate::ports::{OrderRepository, PaymentGateway};

#[derive(Debug, Clone)]
pub struct VerifyOrderPaymentCommand {
    pub order_id: OrderId,
}

pub struct VerifyOrderPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderRepository>,
}

impl VerifyOrderPaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { gateway, orders }
    }

    /// Returns the order after any settlement. Gateway failures leave the
    /// order untouched and are not errors for the caller.
    pub async fn handle(&self, cmd: VerifyOrderPaymentCommand) -> Result<Order, CheckoutError> {
        let order = self.find(&cmd.order_id).await?;
        if order.is_paid {
            return Ok(order);
        }

        let transaction = match self.gateway.verify_transaction(&order.id.to_string()).await {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Transaction verification unavailable");
                return Ok(order);
            }
        };
        if !transaction.is_successful() {
            info!(order_id = %order.id, status = %transaction.status, "Transaction not settled");
            return Ok(order);
        }

        match order.assess_charge(transaction.amount_minor_units)? {
            ChargeAssessment::AlreadyPaid => Ok(order),
            ChargeAssessment::AmountMismatch { expected, received } => {
                error!(
                    alert = "payment_amount_mismatch",
                    order_id = %order.id,
                    expected,
                    received,
                    "Verified amount does not match order total"
                );
                Ok(order)
            }
            ChargeAssessment::Settle => {
                let Some(transaction_id) = transaction.transaction_id else {
                    warn!(order_id = %order.id, "Settled transaction has no id");
                    return Ok(order);
                };
                let confirmation = PaymentConfirmation {
                    transaction_id,
                    gateway_payload: transaction.raw,
                    paid_at: Timestamp::now(),
                };
                match self.orders.mark_paid(&order.id, &confirmation).await? {
                    MarkPaidOutcome::Marked => info!(order_id = %order.id, "Order verified and marked paid"),
                    MarkPaidOutcome::AlreadyPaid => {}
                    MarkPaidOutcome::NotFound => {
                        return Err(CheckoutError::NotFound(format!("Order {} not found", order.id)))
                    }
                }
                self.find(&order.id).await
            }
        }
    }

    async fn find(&self, id: &OrderId) -> Result<Order, CheckoutError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| CheckoutError::NotFound(format!("Order {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::in_memory::InMemoryOrderRepository;
    use crate::adapters::paystack::MockPaymentGateway;
    use crate::ports::{GatewayError, TransactionVerification};
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::json;

    async fn setup(total: Decimal) -> (VerifyOrderPaymentHandler, MockPaymentGateway, InMemoryOrderRepository, OrderId) {
        let gateway = MockPaymentGateway::new();
        let orders = InMemoryOrderRepository::new();
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
        let handler = VerifyOrderPaymentHandler::new(Arc::new(gateway.clone()), Arc::new(orders.clone()));
        (handler, gateway, orders, id)
    }

    fn transaction(id: &OrderId, status: &str, amount: i64) -> TransactionVerification {
        TransactionVerification {
            reference: id.to_string(),
            status: status.into(),
            amount_minor_units: amount,
            transaction_id: Some("777".into()),
            raw: json!({"id": 777, "amount": amount}),
        }
    }

    #[tokio::test]
    async fn successful_exact_transaction_marks_paid() {
        let (handler, gateway, _, id) = setup(Decimal::new(4550, 2)).await;
        gateway.add_transaction(transaction(&id, "success", 4550));
        let order = handler.handle(VerifyOrderPaymentCommand { order_id: id }).await.unwrap();
        assert!(order.is_paid);
        assert_eq!(order.transaction_id.as_deref(), Some("777"));
    }

    #[tokio::test]
    async fn overpayment_does_not_settle() {
        let (handler, gateway, orders, id) = setup(Decimal::new(4550, 2)).await;
        gateway.add_transaction(transaction(&id, "success", 5000));
        let order = handler.handle(VerifyOrderPaymentCommand { order_id: id }).await.unwrap();
        assert!(!order.is_paid);
        assert_eq!(orders.write_count(), 0);
    }

    #[tokio::test]
    async fn abandoned_transaction_returns_current_state() {
        let (handler, gateway, _, id) = setup(Decimal::new(4550, 2)).await;
        gateway.add_transaction(transaction(&id, "abandoned", 4550));
        assert!(!handler.handle(VerifyOrderPaymentCommand { order_id: id }).await.unwrap().is_paid);
    }

    #[tokio::test]
    async fn gateway_failure_returns_current_state() {
        let (handler, gateway, _, id) = setup(Decimal::new(4550, 2)).await;
        gateway.fail("verify_transaction", GatewayError::network("down"));
        let order = handler.handle(VerifyOrderPaymentCommand { order_id: id }).await.unwrap();
        assert!(!order.is_paid);
    }

    #[tokio::test]
    async fn paid_order_skips_gateway() {
        let (handler, gateway, _, id) = setup(Decimal::new(4550, 2)).await;
        gateway.add_transaction(transaction(&id, "success", 4550));
        handler.handle(VerifyOrderPaymentCommand { order_id: id }).await.unwrap();
        handler.handle(VerifyOrderPaymentCommand { order_id: id }).await.unwrap();
        assert_eq!(gateway.verify_calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_order_is_404() {
        let (handler, _, _, _) = setup(Decimal::ONE).await;
        let err = handler
            .handle(VerifyOrderPaymentCommand { order_id: OrderId::new() })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
