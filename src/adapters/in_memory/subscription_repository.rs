//! In-Memory Subscription Repository
//!
//! Counts every write that reaches the store so tests can assert that a
//! rejected webhook wrote nothing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp, UserUid};
use crate::domain::payment::{SubscriptionActivation, SubscriptionState};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionRepository {
    rows: Arc<RwLock<HashMap<UserUid, SubscriptionState>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row without counting it as a write.
    pub async fn insert(&self, state: SubscriptionState) {
        self.rows.write().await.insert(state.overseer_uid.clone(), state);
    }

    /// Number of rows changed through the port.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Makes every subsequent write fail with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn upsert_activation(&self, activation: &SubscriptionActivation) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        rows.entry(activation.overseer_uid.clone())
            .or_insert_with(|| SubscriptionState::inactive(activation.overseer_uid.clone()))
            .apply_activation(activation);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn record_payment_failure(
        &self,
        overseer_uid: &UserUid,
        attempted_at: Timestamp,
    ) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(overseer_uid) {
            Some(state) => {
                state.apply_payment_failure(attempted_at);
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find(&self, overseer_uid: &UserUid) -> Result<Option<SubscriptionState>, DomainError> {
        Ok(self.rows.read().await.get(overseer_uid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::SubscriptionStatus;
    use rust_decimal::Decimal;

    fn activation(uid: &str) -> SubscriptionActivation {
        let now = Timestamp::now();
        SubscriptionActivation {
            overseer_uid: UserUid::new(uid).unwrap(),
            auth_code: "AUTH_1".into(),
            email: "o@example.com".into(),
            charged_at: now,
            charged_amount: Decimal::new(15000, 2),
            member_count: 3,
            next_charge_date: now.add_days(30),
        }
    }

    #[tokio::test]
    async fn failure_without_row_creates_nothing() {
        let repo = InMemorySubscriptionRepository::new();
        let uid = UserUid::new("ghost").unwrap();
        assert!(!repo.record_payment_failure(&uid, Timestamp::now()).await.unwrap());
        assert_eq!(repo.row_count().await, 0);
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn upsert_then_failure_flips_status() {
        let repo = InMemorySubscriptionRepository::new();
        let a = activation("ov-1");
        repo.upsert_activation(&a).await.unwrap();
        assert!(repo.record_payment_failure(&a.overseer_uid, Timestamp::now()).await.unwrap());
        let state = repo.find(&a.overseer_uid).await.unwrap().unwrap();
        assert_eq!(state.status, SubscriptionStatus::PaymentFailed);
        assert_eq!(state.member_count, 3);
    }

    #[tokio::test]
    async fn failing_writes_surface_database_error() {
        let repo = InMemorySubscriptionRepository::new();
        repo.fail_writes(true);
        assert!(repo.upsert_activation(&activation("ov-1")).await.is_err());
        assert_eq!(repo.row_count().await, 0);
    }
}
