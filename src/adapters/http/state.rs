//! Shared application state for the HTTP layer.

use std::sync::Arc;

use secrecy::SecretString;

use crate::adapters::broadcast::BroadcastQueue;
use crate::application::handlers::email::SendCustomEmailHandler;
use crate::application::handlers::payment::{
    CheckoutSettings, CreatePaymentLinkHandler, CreateSellerSubaccountHandler,
    InitializeSubscriptionHandler, ReconcilePaymentWebhookHandler, VerifyOrderPaymentHandler,
};
use crate::application::handlers::verification::VerifyFaceHandler;
use crate::domain::payment::PaystackSignatureVerifier;
use crate::domain::vault::DocumentVault;
use crate::domain::verification::{FaceEmbeddingEngine, MatchPolicy};
use crate::ports::{
    BlobStore, EmailSender, OrderRepository, PaymentGateway, SellerRepository,
    SubscriptionRepository,
};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<DocumentVault>,
    /// `None` when the face model failed to initialize at startup.
    pub face_engine: Option<Arc<FaceEmbeddingEngine>>,
    pub match_policy: MatchPolicy,
    pub webhook_secret: SecretString,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub sellers: Arc<dyn SellerRepository>,
    pub checkout: CheckoutSettings,
    /// `None` when no email provider is configured.
    pub broadcasts: Option<Arc<BroadcastQueue>>,
    /// `None` when no email provider is configured.
    pub email_sender: Option<Arc<dyn EmailSender>>,
    /// Where custom-email report attachments are fetched from.
    pub attachments: Arc<dyn BlobStore>,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn verify_face_handler(&self) -> VerifyFaceHandler {
        VerifyFaceHandler::new(self.vault.clone(), self.face_engine.clone(), self.match_policy)
    }

    pub fn webhook_handler(&self) -> ReconcilePaymentWebhookHandler {
        ReconcilePaymentWebhookHandler::new(
            PaystackSignatureVerifier::new(self.webhook_secret.clone()),
            self.subscriptions.clone(),
            self.orders.clone(),
        )
    }

    pub fn initialize_subscription_handler(&self) -> InitializeSubscriptionHandler {
        InitializeSubscriptionHandler::new(self.payment_gateway.clone(), self.checkout.clone())
    }

    pub fn create_subaccount_handler(&self) -> CreateSellerSubaccountHandler {
        CreateSellerSubaccountHandler::new(
            self.payment_gateway.clone(),
            self.sellers.clone(),
            self.checkout.clone(),
        )
    }

    pub fn payment_link_handler(&self) -> CreatePaymentLinkHandler {
        CreatePaymentLinkHandler::new(self.payment_gateway.clone(), self.checkout.clone())
    }

    /// `None` when no email provider is configured.
    pub fn custom_email_handler(&self) -> Option<SendCustomEmailHandler> {
        self.email_sender
            .clone()
            .map(|sender| SendCustomEmailHandler::new(sender, self.attachments.clone()))
    }

    pub fn verify_order_payment_handler(&self) -> VerifyOrderPaymentHandler {
        VerifyOrderPaymentHandler::new(self.payment_gateway.clone(), self.orders.clone())
    }
}
