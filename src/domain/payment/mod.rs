//! Payment module - Paystack webhook reconciliation and checkout rules.

mod checkout;
mod event;
mod metadata;
mod order;
mod signature;
mod subscription;
mod webhook_errors;

pub use checkout::{
    plan_split, subscription_reference, LineItem, SplitPlan, SubaccountShare, CHECKOUT_CHANNELS,
};
pub use event::{
    classify, Authorization, ChargeData, ClassifiedEvent, Customer, OrderCharge, PaystackEvent,
    PaystackEventType, SubscriptionCharge,
};
pub use metadata::{subscription_custom_fields, ChargeMetadata, CustomField, SUBSCRIPTION_MARKER};
pub use order::{
    to_minor_units, ChargeAssessment, MarkPaidOutcome, Order, PaymentConfirmation, PAID_STATUS,
};
pub use signature::{sign_payload, PaystackSignatureVerifier, SIGNATURE_HEADER};
pub use subscription::{
    SubscriptionActivation, SubscriptionState, SubscriptionStatus, BILLING_PERIOD_DAYS,
};
pub use webhook_errors::WebhookError;
