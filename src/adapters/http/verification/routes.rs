//! Axum router configuration for face verification.

use axum::{routing::post, Router};

use super::handlers::verify_face;
use crate::adapters::http::AppState;

/// Create the verification router.
///
/// # Routes
/// - `POST /verify-face` - Multipart `live_image` + `reference_url`
pub fn verification_routes() -> Router<AppState> {
    Router::new().route("/verify-face", post(verify_face))
}
