//! HTTP adapter for payments: webhook, checkout and order verification.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreatePaymentLinkRequest, CreateSubaccountRequest, InitializeSubscriptionRequest,
    OrderPaymentResponse, WebhookAckResponse,
};
pub use routes::{order_routes, payment_routes};
