//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriptionRepository` - Overseer subscriptions (upsert on charge)
//! - `PostgresOrderRepository` - Orders with the guarded paid-update
//! - `PostgresUserDirectory` - Sellers and broadcast recipients from `users`

mod order_repository;
mod seller_repository;
mod subscription_repository;

pub use order_repository::PostgresOrderRepository;
pub use seller_repository::PostgresUserDirectory;
pub use subscription_repository::PostgresSubscriptionRepository;
