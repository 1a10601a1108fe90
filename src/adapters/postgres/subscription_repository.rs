//! PostgreSQL implementation of SubscriptionRepository.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserUid};
use crate::domain::payment::{SubscriptionActivation, SubscriptionState, SubscriptionStatus};
use crate::ports::SubscriptionRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    uid: String,
    auth_code: Option<String>,
    email: Option<String>,
    status: String,
    last_charged_at: Option<DateTime<Utc>>,
    last_charged_amount: Option<Decimal>,
    member_count: i32,
    next_charge_date: Option<DateTime<Utc>>,
    last_attempted_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for SubscriptionState {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", what, e))
        };
        Ok(SubscriptionState {
            overseer_uid: UserUid::new(row.uid).map_err(|e| corrupt("uid", &e))?,
            auth_code: row.auth_code,
            email: row.email,
            status: row
                .status
                .parse::<SubscriptionStatus>()
                .map_err(|e| corrupt("status", &e))?,
            last_charged_at: row.last_charged_at.map(Timestamp::from_datetime),
            last_charged_amount: row.last_charged_amount,
            member_count: u32::try_from(row.member_count).map_err(|e| corrupt("member_count", &e))?,
            next_charge_date: row.next_charge_date.map(Timestamp::from_datetime),
            last_attempted_at: row.last_attempted_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn upsert_activation(&self, activation: &SubscriptionActivation) -> Result<(), DomainError> {
        let member_count = i32::try_from(activation.member_count).map_err(|_| {
            DomainError::new(ErrorCode::ValidationFailed, "member_count exceeds storage range")
        })?;

        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                uid, auth_code, email, status, last_charged_at, last_charged_amount,
                member_count, next_charge_date, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (uid) DO UPDATE SET
                auth_code = EXCLUDED.auth_code,
                email = EXCLUDED.email,
                status = EXCLUDED.status,
                last_charged_at = EXCLUDED.last_charged_at,
                last_charged_amount = EXCLUDED.last_charged_amount,
                member_count = EXCLUDED.member_count,
                next_charge_date = EXCLUDED.next_charge_date,
                updated_at = NOW()
            "#,
        )
        .bind(activation.overseer_uid.as_str())
        .bind(&activation.auth_code)
        .bind(&activation.email)
        .bind(SubscriptionStatus::Active.as_str())
        .bind(activation.charged_at.as_datetime())
        .bind(activation.charged_amount)
        .bind(member_count)
        .bind(activation.next_charge_date.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert subscription: {}", e)))?;

        Ok(())
    }

    async fn record_payment_failure(
        &self,
        overseer_uid: &UserUid,
        attempted_at: Timestamp,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                status = $2,
                last_attempted_at = $3,
                updated_at = NOW()
            WHERE uid = $1
            "#,
        )
        .bind(overseer_uid.as_str())
        .bind(SubscriptionStatus::PaymentFailed.as_str())
        .bind(attempted_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record payment failure: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, overseer_uid: &UserUid) -> Result<Option<SubscriptionState>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT uid, auth_code, email, status, last_charged_at, last_charged_amount,
                   member_count, next_charge_date, last_attempted_at
            FROM subscriptions
            WHERE uid = $1
            "#,
        )
        .bind(overseer_uid.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch subscription: {}", e)))?;

        row.map(SubscriptionState::try_from).transpose()
    }
}
