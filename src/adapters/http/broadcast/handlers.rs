//! HTTP handlers for broadcast endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{BroadcastAcceptedResponse, LegalBroadcastRequest};
use crate::adapters::broadcast::BroadcastQueue;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::AppState;
use crate::domain::broadcast::LegalDocuments;
use crate::domain::foundation::BroadcastJobId;

fn queue(state: &AppState) -> Result<&Arc<BroadcastQueue>, ApiError> {
    state.broadcasts.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "EMAIL_NOT_CONFIGURED",
            "Email delivery is not configured on this server",
        )
    })
}

/// POST /api/broadcasts/legal - Queue a legal-update email to every member
pub async fn submit_legal_broadcast(
    State(state): State<AppState>,
    Json(request): Json<LegalBroadcastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = LegalDocuments::new(request.include_terms, request.include_policy)?;
    let job_id = queue(&state)?.submit(documents).await?;
    Ok((StatusCode::ACCEPTED, Json(BroadcastAcceptedResponse { job_id })))
}

/// GET /api/broadcasts/:job_id - Progress of a broadcast job
pub async fn get_broadcast(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let not_found = || ApiError::not_found(format!("Broadcast job not found: {}", job_id));
    let id: BroadcastJobId = job_id.parse().map_err(|_| not_found())?;
    let job = queue(&state)?.status(&id).await.ok_or_else(not_found)?;
    Ok(Json(job))
}
