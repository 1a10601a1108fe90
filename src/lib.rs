//! TACT backend - encrypted document vault, face verification and Paystack
//! payment reconciliation.
//!
//! Laid out hexagonally: `domain` holds the rules, `ports` the seams,
//! `adapters` the infrastructure and `application` one handler per use case.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
