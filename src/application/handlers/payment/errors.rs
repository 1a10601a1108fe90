//! Errors for the outbound checkout handlers.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::GatewayError;

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Database(String),
}

impl CheckoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gateway(err) => err.status_code(),
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Gateway(err) => err.code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DomainError> for CheckoutError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::OrderNotFound | ErrorCode::SellerNotFound | ErrorCode::SubscriptionNotFound => {
                Self::NotFound(err.message)
            }
            ErrorCode::ValidationFailed => {
                let field = err.details.get("field").cloned().unwrap_or_default();
                Self::Validation(ValidationError::invalid_format(field, err.message))
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => Self::Database(err.message),
        }
    }
}

/// Rejects blank text fields.
pub(crate) fn require(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_email(field: &str, value: &str) -> Result<String, ValidationError> {
    let email = require(field, value)?;
    if !email.contains('@') {
        return Err(ValidationError::invalid_format(field, "not an email address"));
    }
    Ok(email)
}
