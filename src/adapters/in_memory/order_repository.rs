//! In-Memory Order Repository
//!
//! The paid-update runs under the write lock, so concurrent `mark_paid`
//! calls for one order behave like the guarded SQL update: exactly one
//! returns `Marked`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::payment::{MarkPaidOutcome, Order, PaymentConfirmation, PAID_STATUS};
use crate::ports::OrderRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    pub async fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().await.get(id).cloned()
    }

    /// Number of orders flipped to paid through the port.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn mark_paid(
        &self,
        id: &OrderId,
        confirmation: &PaymentConfirmation,
    ) -> Result<MarkPaidOutcome, DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("connection reset"));
        }
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(id) else {
            return Ok(MarkPaidOutcome::NotFound);
        };
        if order.is_paid {
            return Ok(MarkPaidOutcome::AlreadyPaid);
        }
        order.is_paid = true;
        order.status = PAID_STATUS.to_string();
        order.transaction_id = Some(confirmation.transaction_id.clone());
        order.gateway_payload = Some(confirmation.gateway_payload.clone());
        order.paid_at = Some(confirmation.paid_at);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(MarkPaidOutcome::Marked)
    }
}
