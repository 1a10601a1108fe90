//! In-Memory User Directory
//!
//! Backs both `SellerRepository` and `RecipientDirectory`, mirroring the
//! single `users` table the Postgres adapter reads.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserUid};
use crate::ports::{RecipientDirectory, Seller, SellerRepository};

#[derive(Debug, Clone, Default)]
struct UserRow {
    email: Option<String>,
    subaccount_code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<BTreeMap<UserUid, UserRow>>>,
    fail_listing: Arc<AtomicBool>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, uid: UserUid, email: Option<&str>) {
        self.users.write().await.insert(
            uid,
            UserRow {
                email: email.map(str::to_string),
                subaccount_code: None,
            },
        );
    }

    /// Makes `recipient_emails` fail.
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SellerRepository for InMemoryUserDirectory {
    async fn find_by_uid(&self, uid: &UserUid) -> Result<Option<Seller>, DomainError> {
        Ok(self.users.read().await.get(uid).map(|row| Seller {
            uid: uid.clone(),
            subaccount_code: row.subaccount_code.clone(),
        }))
    }

    async fn set_subaccount_code(&self, uid: &UserUid, subaccount_code: &str) -> Result<(), DomainError> {
        match self.users.write().await.get_mut(uid) {
            Some(row) => {
                row.subaccount_code = Some(subaccount_code.to_string());
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SellerNotFound,
                format!("User with uid {} not found", uid),
            )),
        }
    }
}

#[async_trait]
impl RecipientDirectory for InMemoryUserDirectory {
    async fn recipient_emails(&self) -> Result<Vec<String>, DomainError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(DomainError::database("users table unavailable"));
        }
        let emails: BTreeSet<String> = self
            .users
            .read()
            .await
            .values()
            .filter_map(|row| row.email.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        Ok(emails.into_iter().collect())
    }
}
