//! Axum router configuration for email endpoints.

use axum::{routing::post, Router};

use super::handlers::send_custom_email;
use crate::adapters::http::AppState;

/// Create the email router.
///
/// # Routes
/// - `POST /custom` - Send one email, 200 with `{success, attachment_included}`
pub fn email_routes() -> Router<AppState> {
    Router::new().route("/custom", post(send_custom_email))
}
