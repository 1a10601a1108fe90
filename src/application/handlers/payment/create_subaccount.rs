//! CreateSellerSubaccountHandler - Registers a seller's settlement account.

use std::sync::Arc;

use serde::Serialize;

use super::errors::{require, require_email};
use super::{CheckoutError, CheckoutSettings};
use crate::domain::foundation::UserUid;
use crate::ports::{CreateSubaccountRequest, PaymentGateway, SellerRepository};

#[derive(Debug, Clone)]
pub struct CreateSellerSubaccountCommand {
    pub uid: String,
    pub business_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerSubaccount {
    pub subaccount_code: String,
}

pub struct CreateSellerSubaccountHandler {
    gateway: Arc<dyn PaymentGateway>,
    sellers: Arc<dyn SellerRepository>,
    settings: CheckoutSettings,
}

impl CreateSellerSubaccountHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        sellers: Arc<dyn SellerRepository>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            gateway,
            sellers,
            settings,
        }
    }

    pub async fn handle(&self, cmd: CreateSellerSubaccountCommand) -> Result<SellerSubaccount, CheckoutError> {
        let uid = UserUid::new(cmd.uid)?;
        let request = CreateSubaccountRequest {
            business_name: require("business_name", &cmd.business_name)?,
            bank_code: require("bank_code", &cmd.bank_code)?,
            account_number: require("account_number", &cmd.account_number)?,
            percentage_charge: self.settings.platform_fee_percent,
            primary_contact_email: require_email("contact_email", &cmd.contact_email)?,
        };

        if self.sellers.find_by_uid(&uid).await?.is_none() {
            return Err(CheckoutError::NotFound(format!("User with uid {} not found", uid)));
        }

        let subaccount = self.gateway.create_subaccount(request).await?;
        self.sellers
            .set_subaccount_code(&uid, &subaccount.subaccount_code)
            .await?;

        tracing::info!(uid = %uid, subaccount_code = %subaccount.subaccount_code, "Seller subaccount linked");
        Ok(SellerSubaccount {
            subaccount_code: subaccount.subaccount_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::in_memory::InMemoryUserDirectory;
    use crate::adapters::paystack::MockPaymentGateway;
    use crate::ports::GatewayError;
    use axum::http::StatusCode;
    use rust_decimal::Decimal;

    fn command(uid: &str) -> CreateSellerSubaccountCommand {
        CreateSellerSubaccountCommand {
            uid: uid.into(),
            business_name: "Mama's Crafts".into(),
            bank_code: "051".into(),
            account_number: "0123456789".into(),
            contact_email: "seller@example.com".into(),
        }
    }

    async fn setup() -> (CreateSellerSubaccountHandler, MockPaymentGateway, InMemoryUserDirectory) {
        let gateway = MockPaymentGateway::new();
        let users = InMemoryUserDirectory::new();
        users.add_user(UserUid::new("seller-1").unwrap(), Some("seller@example.com")).await;
        let handler = CreateSellerSubaccountHandler::new(
            Arc::new(gateway.clone()),
            Arc::new(users.clone()),
            CheckoutSettings::default(),
        );
        (handler, gateway, users)
    }

    #[tokio::test]
    async fn persists_returned_code_and_charges_platform_fee() {
        let (handler, gateway, users) = setup().await;
        let result = handler.handle(command("seller-1")).await.unwrap();

        let seller = users.find_by_uid(&UserUid::new("seller-1").unwrap()).await.unwrap().unwrap();
        assert_eq!(seller.subaccount_code, Some(result.subaccount_code));
        assert_eq!(gateway.subaccount_requests()[0].percentage_charge, Decimal::from(9));
    }

    #[tokio::test]
    async fn unknown_seller_is_404_without_gateway_call() {
        let (handler, gateway, _) = setup().await;
        let err = handler.handle(command("nobody")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(gateway.subaccount_requests().is_empty());
    }

    #[tokio::test]
    async fn gateway_message_is_relayed() {
        let (handler, gateway, users) = setup().await;
        gateway.fail("create_subaccount", GatewayError::Rejected("Account details are invalid".into()));
        let err = handler.handle(command("seller-1")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Account details are invalid");
        let seller = users.find_by_uid(&UserUid::new("seller-1").unwrap()).await.unwrap().unwrap();
        assert!(seller.subaccount_code.is_none());
    }
}
