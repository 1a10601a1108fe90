//! HTTP handlers for face verification.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{VerifyFaceResponse, LIVE_IMAGE_FIELD, REFERENCE_FIELD};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::AppState;
use crate::application::handlers::verification::VerifyFaceCommand;
use crate::domain::verification::VerificationFailure;

/// POST /api/verify-face - Compare a live capture with a stored reference
///
/// Unscored outcomes (no face, unreadable reference) are still 200 with
/// `matched = false`. Only bad input (including a locator that is neither a
/// vault reference nor an absolute URL) and a missing engine change the status.
pub async fn verify_face(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut live_image = None;
    let mut reference = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(LIVE_IMAGE_FIELD) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Could not read live image: {}", e)))?;
                live_image = Some(bytes.to_vec());
            }
            Some(REFERENCE_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Could not read reference: {}", e)))?;
                reference = Some(text);
            }
            _ => {}
        }
    }

    let (live_image, reference_locator) = match (live_image, reference) {
        (Some(image), Some(reference)) if !image.is_empty() && !reference.trim().is_empty() => {
            (image, reference)
        }
        _ => {
            return Err(ApiError::bad_request(format!(
                "Both '{}' and '{}' are required",
                LIVE_IMAGE_FIELD, REFERENCE_FIELD
            )))
        }
    };

    let handler = state.verify_face_handler();
    let result = handler
        .handle(VerifyFaceCommand {
            live_image,
            reference_locator,
        })
        .await
        .map_err(|aborted| {
            tracing::error!(error = %aborted, "Face verification aborted");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "VERIFICATION_ABORTED",
                "Face verification could not run",
            )
        })?;

    let status = match &result.failure {
        Some(VerificationFailure::EngineUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
        Some(VerificationFailure::InvalidInput(_) | VerificationFailure::InvalidReference(_)) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::OK,
    };

    Ok((status, Json(VerifyFaceResponse::from(&result))))
}
