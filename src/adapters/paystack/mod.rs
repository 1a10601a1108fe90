//! Paystack payment gateway adapter.

mod api_types;
mod mock_payment_gateway;
mod paystack_gateway;

pub use mock_payment_gateway::MockPaymentGateway;
pub use paystack_gateway::{PaystackConfig, PaystackGateway};
