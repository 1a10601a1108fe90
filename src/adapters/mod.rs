//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `blob_store` - HTTP object store and an in-memory store
//! - `face` - HTTP model server backend and a deterministic mock
//! - `paystack` - Paystack REST gateway and a mock
//! - `postgres` - sqlx repositories
//! - `in_memory` - repositories for tests and local runs
//! - `email` - Resend sender and a recording sender
//! - `broadcast` - bounded worker pool for bulk email
//! - `http` - axum routes

pub mod blob_store;
pub mod broadcast;
pub mod email;
pub mod face;
pub mod http;
pub mod in_memory;
pub mod paystack;
pub mod postgres;
