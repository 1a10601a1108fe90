//! PostgreSQL implementation of SellerRepository and RecipientDirectory.
//!
//! Both read the `users` table: sellers are members carrying a
//! `seller_paystack_account`, recipients are every member with an email.

use crate::domain::foundation::{DomainError, ErrorCode, UserUid};
use crate::ports::{RecipientDirectory, Seller, SellerRepository};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SellerRepository for PostgresUserDirectory {
    async fn find_by_uid(&self, uid: &UserUid) -> Result<Option<Seller>, DomainError> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT uid, seller_paystack_account FROM users WHERE uid = $1")
                .bind(uid.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(|(uid, subaccount_code)| {
            Ok(Seller {
                uid: UserUid::new(uid).map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid uid: {}", e))
                })?,
                subaccount_code,
            })
        })
        .transpose()
    }

    async fn set_subaccount_code(&self, uid: &UserUid, subaccount_code: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET seller_paystack_account = $2 WHERE uid = $1")
            .bind(uid.as_str())
            .bind(subaccount_code)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to save subaccount: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SellerNotFound,
                format!("User with uid {} not found", uid),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecipientDirectory for PostgresUserDirectory {
    async fn recipient_emails(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT TRIM(email)
            FROM users
            WHERE email IS NOT NULL AND TRIM(email) <> ''
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list recipients: {}", e)))
    }
}
