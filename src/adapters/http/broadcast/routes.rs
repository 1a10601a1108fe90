//! Axum router configuration for broadcast endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_broadcast, submit_legal_broadcast};
use crate::adapters::http::AppState;

/// Create the broadcast router.
///
/// # Routes
/// - `POST /legal` - Queue a legal-update broadcast, 202 with `{job_id}`
/// - `GET /:job_id` - Job status
pub fn broadcast_routes() -> Router<AppState> {
    Router::new()
        .route("/legal", post(submit_legal_broadcast))
        .route("/:job_id", get(get_broadcast))
}
