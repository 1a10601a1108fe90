//! Axum router configuration for payment endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    create_payment_link, create_subaccount, initialize_subscription, paystack_webhook,
    verify_order_payment,
};
use crate::adapters::http::AppState;

/// Create the payments router.
///
/// # Routes
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - Paystack events
///
/// ## Checkout Endpoints
/// - `POST /subscriptions/initialize` - Hosted checkout for a monthly plan
/// - `POST /subaccounts` - Register a seller subaccount
/// - `POST /checkout` - Split checkout link
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(paystack_webhook))
        .route("/subscriptions/initialize", post(initialize_subscription))
        .route("/subaccounts", post(create_subaccount))
        .route("/checkout", post(create_payment_link))
}

/// Create the orders router.
///
/// # Routes
/// - `POST /:id/verify-payment` - Settle an order from the gateway's view
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/:id/verify-payment", post(verify_order_payment))
}
