//! Shared HTTP error mapping.
//!
//! Every handler error converts into [`ApiError`], which renders as
//! `{ "code": ..., "message": ... }` with the status the error type chose.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::adapters::broadcast::BroadcastError;
use crate::application::handlers::email::CustomEmailError;
use crate::application::handlers::payment::CheckoutError;
use crate::domain::foundation::ValidationError;
use crate::domain::payment::WebhookError;
use crate::domain::vault::VaultError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts boundary errors to HTTP responses.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code, message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.body.code
    }

    /// Server-side failures keep their detail in the logs only.
    fn internal(status: StatusCode, code: &str, detail: impl std::fmt::Display) -> Self {
        tracing::error!(status = status.as_u16(), code, error = %detail, "Request failed");
        Self::new(status, code, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        let status = err.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Self::internal(status, err.code(), &err);
        }
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::Database(_) => Self::internal(err.status_code(), err.code(), &err),
            _ => Self::new(err.status_code(), err.code(), err.to_string()),
        }
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        match &err {
            WebhookError::Database(_) => Self::internal(err.status_code(), err.code(), &err),
            _ => Self::new(err.status_code(), err.code(), err.to_string()),
        }
    }
}

impl From<BroadcastError> for ApiError {
    fn from(err: BroadcastError) -> Self {
        Self::new(err.status_code(), err.code(), err.to_string())
    }
}

impl From<CustomEmailError> for ApiError {
    fn from(err: CustomEmailError) -> Self {
        Self::new(err.status_code(), err.code(), err.to_string())
    }
}
