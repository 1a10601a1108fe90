//! Broadcast job execution.

mod worker_pool;

pub use worker_pool::{BroadcastError, BroadcastPoolConfig, BroadcastQueue};
