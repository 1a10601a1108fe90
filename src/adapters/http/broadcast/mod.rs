//! HTTP adapter for legal-update broadcasts.

mod dto;
mod handlers;
mod routes;

pub use dto::{BroadcastAcceptedResponse, LegalBroadcastRequest};
pub use routes::broadcast_routes;
