//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors)
//! - `vault` - Encrypted at-rest document storage
//! - `verification` - Face embeddings, match policy and results
//! - `payment` - Paystack webhook reconciliation, orders, subscriptions, splits
//! - `broadcast` - Legal-update email jobs

pub mod broadcast;
pub mod foundation;
pub mod payment;
pub mod vault;
pub mod verification;
