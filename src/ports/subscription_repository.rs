//! Subscription repository port.
//!
//! One row per overseer. Activation is an upsert that replaces every field
//! at once so a replayed webhook converges on the same state; a payment
//! failure only touches rows that already exist.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserUid};
use crate::domain::payment::{SubscriptionActivation, SubscriptionState};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Creates or fully replaces the overseer's subscription as active.
    ///
    /// Must be a single atomic write.
    async fn upsert_activation(&self, activation: &SubscriptionActivation) -> Result<(), DomainError>;

    /// Marks an existing subscription as `payment_failed`.
    ///
    /// Returns `false` when the overseer has no subscription row; no row is
    /// created in that case.
    async fn record_payment_failure(
        &self,
        overseer_uid: &UserUid,
        attempted_at: Timestamp,
    ) -> Result<bool, DomainError>;

    /// Current subscription of an overseer, if any.
    async fn find(&self, overseer_uid: &UserUid) -> Result<Option<SubscriptionState>, DomainError>;
}
