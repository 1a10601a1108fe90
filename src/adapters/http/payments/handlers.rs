//! HTTP handlers for payment endpoints.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::dto::{
    CreatePaymentLinkRequest, CreateSubaccountRequest, InitializeSubscriptionRequest,
    OrderPaymentResponse, WebhookAckResponse,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::AppState;
use crate::application::handlers::payment::{
    CreatePaymentLinkCommand, CreateSellerSubaccountCommand, InitializeSubscriptionCommand,
    ReconcileWebhookCommand, VerifyOrderPaymentCommand,
};
use crate::domain::foundation::OrderId;
use crate::domain::payment::SIGNATURE_HEADER;

// ════════════════════════════════════════════════════════════════════════════════
// Webhook (no auth, signature verified)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/webhook - Reconcile a Paystack event
///
/// The body is passed through untouched; the signature covers the raw bytes.
pub async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let handler = state.webhook_handler();
    let cmd = ReconcileWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match handler.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(WebhookAckResponse::processed(outcome))).into_response(),
        Err(err) if err.is_rejection() => {
            (err.status_code(), Json(WebhookAckResponse::rejected(&err))).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/subscriptions/initialize - Hosted checkout for a plan
pub async fn initialize_subscription(
    State(state): State<AppState>,
    Json(request): Json<InitializeSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.initialize_subscription_handler();
    let cmd = InitializeSubscriptionCommand {
        email: request.email,
        overseer_uid: request.uid,
        plan_code: request.plan_code,
        member_count: request.member_count,
    };

    let checkout = handler.handle(cmd).await?;
    Ok(Json(checkout))
}

/// POST /api/payments/subaccounts - Register a seller subaccount
pub async fn create_subaccount(
    State(state): State<AppState>,
    Json(request): Json<CreateSubaccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_subaccount_handler();
    let cmd = CreateSellerSubaccountCommand {
        uid: request.uid,
        business_name: request.business_name,
        bank_code: request.bank_code,
        account_number: request.account_number,
        contact_email: request.contact_email,
    };

    let subaccount = handler.handle(cmd).await?;
    Ok(Json(subaccount))
}

/// POST /api/payments/checkout - Split checkout link for a basket
pub async fn create_payment_link(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.payment_link_handler();
    let cmd = CreatePaymentLinkCommand {
        email: request.email,
        products: request.products,
        order_reference: request.order_reference,
    };

    let link = handler.handle(cmd).await?;
    Ok(Json(link))
}

// ════════════════════════════════════════════════════════════════════════════════
// Orders
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/orders/:id/verify-payment - Pull transaction state for an order
pub async fn verify_order_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id: OrderId = id
        .parse()
        .map_err(|_| ApiError::not_found(format!("Order not found: {}", id)))?;

    let handler = state.verify_order_payment_handler();
    let order = handler.handle(VerifyOrderPaymentCommand { order_id }).await?;
    Ok(Json(OrderPaymentResponse::from(order)))
}
