//! Payment handlers - webhook reconciliation and outbound checkout.

mod create_payment_link;
mod create_subaccount;
mod errors;
mod initialize_subscription;
mod reconcile_webhook;
mod verify_order_payment;

use rust_decimal::Decimal;

pub use create_payment_link::{CreatePaymentLinkCommand, CreatePaymentLinkHandler, PaymentLink};
pub use create_subaccount::{
    CreateSellerSubaccountCommand, CreateSellerSubaccountHandler, SellerSubaccount,
};
pub use errors::CheckoutError;
pub use initialize_subscription::{
    InitializeSubscriptionCommand, InitializeSubscriptionHandler, SubscriptionCheckout,
};
pub use reconcile_webhook::{ReconcilePaymentWebhookHandler, ReconcileWebhookCommand, WebhookOutcome};
pub use verify_order_payment::{VerifyOrderPaymentCommand, VerifyOrderPaymentHandler};

/// Gateway-independent checkout settings shared by the outbound handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSettings {
    /// ISO currency code for every transaction.
    pub currency: String,
    /// Platform cut in percent; sellers receive the rest of their lines.
    pub platform_fee_percent: Decimal,
    pub subscription_callback_url: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: "ZAR".to_string(),
            platform_fee_percent: Decimal::from(9),
            subscription_callback_url: "https://standard.paystack.co/close".to_string(),
        }
    }
}
