//! HTTP adapter for operator emails.

mod dto;
mod handlers;
mod routes;

pub use dto::{CustomEmailRequest, CustomEmailResponse};
pub use routes::email_routes;
