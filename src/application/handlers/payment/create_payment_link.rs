//! CreatePaymentLinkHandler - Split checkout across seller subaccounts.

use std::sync::Arc;

use serde::Serialize;

use super::errors::{require, require_email};
use super::{CheckoutError, CheckoutSettings};
use crate::domain::payment::{plan_split, LineItem, CHECKOUT_CHANNELS};
use crate::ports::{InitializeTransactionRequest, PaymentGateway};

#[derive(Debug, Clone)]
pub struct CreatePaymentLinkCommand {
    pub email: String,
    pub products: Vec<LineItem>,
    pub order_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub payment_link: String,
    pub reference: String,
}

pub struct CreatePaymentLinkHandler {
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
}

impl CreatePaymentLinkHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, settings: CheckoutSettings) -> Self {
        Self { gateway, settings }
    }

    pub async fn handle(&self, cmd: CreatePaymentLinkCommand) -> Result<PaymentLink, CheckoutError> {
        let email = require_email("email", &cmd.email)?;
        let reference = require("orderReference", &cmd.order_reference)?;
        let plan = plan_split(&cmd.products, self.settings.platform_fee_percent)?;

        let mut request = InitializeTransactionRequest::new(
            email,
            plan.total_minor_units,
            self.settings.currency.clone(),
            reference.clone(),
        );
        request.channels = CHECKOUT_CHANNELS.iter().map(|c| c.to_string()).collect();
        if !plan.shares.is_empty() {
            request.split = Some(plan.shares);
        }

        let authorization = self.gateway.initialize_transaction(request).await?;
        tracing::info!(
            reference = %reference,
            amount = plan.total_minor_units,
            "Checkout link created"
        );
        Ok(PaymentLink {
            payment_link: authorization.authorization_url,
            reference,
        })
    }
}
