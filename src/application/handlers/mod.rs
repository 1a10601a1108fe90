//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over ports.

pub mod email;
pub mod payment;
pub mod verification;

pub use email::{
    CustomEmailError, CustomEmailReceipt, SendCustomEmailCommand, SendCustomEmailHandler,
};
pub use payment::{
    CheckoutError, CheckoutSettings, CreatePaymentLinkCommand, CreatePaymentLinkHandler,
    CreateSellerSubaccountCommand, CreateSellerSubaccountHandler, InitializeSubscriptionCommand,
    InitializeSubscriptionHandler, PaymentLink, ReconcilePaymentWebhookHandler,
    ReconcileWebhookCommand, SellerSubaccount, SubscriptionCheckout, VerifyOrderPaymentCommand,
    VerifyOrderPaymentHandler, WebhookOutcome,
};
pub use verification::{VerificationAborted, VerifyFaceCommand, VerifyFaceHandler};
