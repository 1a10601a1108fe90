//! Operator email handlers.

mod send_custom_email;

pub use send_custom_email::{
    CustomEmailError, CustomEmailReceipt, SendCustomEmailCommand, SendCustomEmailHandler,
};
