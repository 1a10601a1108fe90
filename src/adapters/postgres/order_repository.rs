//! PostgreSQL implementation of OrderRepository.
//!
//! The paid-update is a single conditional `UPDATE`; when it touches no row
//! a follow-up existence check tells "already paid" apart from "missing".

use crate::domain::foundation::{DomainError, OrderId, Timestamp};
use crate::domain::payment::{MarkPaidOutcome, Order, PaymentConfirmation, PAID_STATUS};
use crate::ports::OrderRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    total_amount: Decimal,
    is_paid: bool,
    status: String,
    transaction_id: Option<String>,
    paystack_transaction_data: Option<Value>,
    paid_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: OrderId::from_uuid(row.id),
            total_amount: row.total_amount,
            is_paid: row.is_paid,
            status: row.status,
            transaction_id: row.transaction_id,
            gateway_payload: row.paystack_transaction_data,
            paid_at: row.paid_at.map(Timestamp::from_datetime),
        }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, total_amount, is_paid, status, transaction_id,
                   paystack_transaction_data, paid_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch order: {}", e)))?;

        Ok(row.map(Order::from))
    }

    async fn mark_paid(
        &self,
        id: &OrderId,
        confirmation: &PaymentConfirmation,
    ) -> Result<MarkPaidOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                is_paid = TRUE,
                status = $2,
                transaction_id = $3,
                paystack_transaction_data = $4,
                paid_at = $5
            WHERE id = $1 AND is_paid = FALSE
            "#,
        )
        .bind(id.as_uuid())
        .bind(PAID_STATUS)
        .bind(&confirmation.transaction_id)
        .bind(&confirmation.gateway_payload)
        .bind(confirmation.paid_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to mark order paid: {}", e)))?;

        if result.rows_affected() > 0 {
            return Ok(MarkPaidOutcome::Marked);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to check order: {}", e)))?;

        Ok(if exists {
            MarkPaidOutcome::AlreadyPaid
        } else {
            MarkPaidOutcome::NotFound
        })
    }
}
