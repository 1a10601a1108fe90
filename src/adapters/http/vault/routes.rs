//! Axum router configuration for vault endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_image, upload_document};
use crate::adapters::http::AppState;

/// Create the vault router.
///
/// # Routes
/// - `GET /image?url=<ref>` - Decrypted image bytes
/// - `POST /documents` - Multipart `file` + `folder`, returns `{url}`
pub fn vault_routes() -> Router<AppState> {
    Router::new()
        .route("/image", get(get_image))
        .route("/documents", post(upload_document))
}
