//! HTTP handlers for email endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{CustomEmailRequest, CustomEmailResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::AppState;
use crate::application::handlers::email::SendCustomEmailCommand;

/// POST /api/emails/custom - Send one email, optionally with a PDF report
pub async fn send_custom_email(
    State(state): State<AppState>,
    Json(request): Json<CustomEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.custom_email_handler().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "EMAIL_NOT_CONFIGURED",
            "Email delivery is not configured on this server",
        )
    })?;

    let receipt = handler
        .handle(SendCustomEmailCommand {
            to: request.to,
            subject: request.subject,
            body: request.body,
            attachment_url: request.attachment_url,
        })
        .await?;

    Ok(Json(CustomEmailResponse {
        success: true,
        attachment_included: receipt.attachment_included,
    }))
}
