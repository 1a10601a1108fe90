//! InitializeSubscriptionHandler - Opens a hosted checkout for a monthly plan.

use std::sync::Arc;

use serde::Serialize;

use super::errors::{require, require_email};
use super::{CheckoutError, CheckoutSettings};
use crate::domain::foundation::{Timestamp, UserUid};
use crate::domain::payment::{subscription_custom_fields, subscription_reference};
use crate::ports::{InitializeTransactionRequest, PaymentGateway};

#[derive(Debug, Clone)]
pub struct InitializeSubscriptionCommand {
    pub email: String,
    pub overseer_uid: String,
    pub plan_code: String,
    pub member_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionCheckout {
    pub authorization_url: String,
    pub reference: String,
}

pub struct InitializeSubscriptionHandler {
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
}

impl InitializeSubscriptionHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, settings: CheckoutSettings) -> Self {
        Self { gateway, settings }
    }

    /// The plan sets the price, so the transaction amount is zero. The
    /// custom fields come back on the webhook and drive activation.
    pub async fn handle(&self, cmd: InitializeSubscriptionCommand) -> Result<SubscriptionCheckout, CheckoutError> {
        let email = require_email("email", &cmd.email)?;
        let overseer_uid = UserUid::new(cmd.overseer_uid)?;
        let plan_code = require("plan_code", &cmd.plan_code)?;

        let reference = subscription_reference(&overseer_uid, Timestamp::now());
        let mut request = InitializeTransactionRequest::new(email, 0, self.settings.currency.clone(), reference.clone());
        request.plan = Some(plan_code.clone());
        request.callback_url = Some(self.settings.subscription_callback_url.clone());
        request.custom_fields = subscription_custom_fields(overseer_uid.as_str(), &plan_code, cmd.member_count);

        let authorization = self.gateway.initialize_transaction(request).await.map_err(|e| {
            tracing::warn!(overseer_uid = %overseer_uid, error = %e, "Subscription initialization failed");
            e
        })?;
        tracing::info!(overseer_uid = %overseer_uid, reference = %reference, "Subscription checkout created");

        Ok(SubscriptionCheckout {
            authorization_url: authorization.authorization_url,
            reference,
        })
    }
}
