//! In-memory repository adapters for tests and local development.

mod order_repository;
mod subscription_repository;
mod user_directory;

pub use order_repository::InMemoryOrderRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use user_directory::InMemoryUserDirectory;
