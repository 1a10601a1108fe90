//! HTTP adapters - REST API implementations.
//!
//! Each area has its own dto/handlers/routes module; [`router`] nests them
//! under `/api` and applies the cross-cutting layers.

mod error;
mod health;
mod state;

pub mod broadcast;
pub mod email;
pub mod payments;
pub mod vault;
pub mod verification;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};
pub use health::{EncryptionStatus, HealthResponse};
pub use state::AppState;

/// Request-level limits applied to every route.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Create the complete API router.
///
/// # Routes
/// - `GET /health`
/// - `POST /api/verify-face`
/// - `/api/vault/*` - see [`vault::vault_routes`]
/// - `/api/payments/*` - see [`payments::payment_routes`]
/// - `/api/orders/*` - see [`payments::order_routes`]
/// - `/api/broadcasts/*` - see [`broadcast::broadcast_routes`]
/// - `/api/emails/*` - see [`email::email_routes`]
pub fn router(state: AppState, limits: HttpLimits) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .merge(verification::verification_routes())
        .nest("/vault", vault::vault_routes())
        .nest("/payments", payments::payment_routes())
        .nest("/orders", payments::order_routes())
        .nest("/broadcasts", broadcast::broadcast_routes())
        .nest("/emails", email::email_routes());

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
