//! HTTP adapter for face verification.

mod dto;
mod handlers;
mod routes;

pub use dto::VerifyFaceResponse;
pub use routes::verification_routes;
