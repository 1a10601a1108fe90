//! Seller repository port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, UserUid};

/// What the payment flow needs to know about a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seller {
    pub uid: UserUid,
    pub subaccount_code: Option<String>,
}

#[async_trait]
pub trait SellerRepository: Send + Sync {
    async fn find_by_uid(&self, uid: &UserUid) -> Result<Option<Seller>, DomainError>;

    /// Stores the gateway subaccount code on the seller.
    ///
    /// # Errors
    ///
    /// - `SellerNotFound` if the seller doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn set_subaccount_code(&self, uid: &UserUid, subaccount_code: &str) -> Result<(), DomainError>;
}
