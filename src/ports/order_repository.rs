//! Order repository port.
//!
//! Orders are created elsewhere; this service only reads them and flips
//! them to paid.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::payment::{MarkPaidOutcome, Order, PaymentConfirmation};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Marks an unpaid order as paid in one guarded write.
    ///
    /// The write only applies while the order is still unpaid, so two
    /// concurrent deliveries of the same charge settle it exactly once.
    /// `AlreadyPaid` and `NotFound` both mean nothing was written.
    async fn mark_paid(
        &self,
        id: &OrderId,
        confirmation: &PaymentConfirmation,
    ) -> Result<MarkPaidOutcome, DomainError>;
}
