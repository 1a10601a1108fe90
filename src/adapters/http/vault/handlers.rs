//! HTTP handlers for vault endpoints.

use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{ImageQuery, StoredDocumentResponse, FILE_FIELD, FOLDER_FIELD};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::AppState;
use crate::domain::vault::{VaultReference, APPLICATION_FOLDER};

/// Content type of every served image.
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// GET /api/vault/image?url=<ref> - Serve a stored image as plaintext
pub async fn get_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "MISSING_URL", "Query parameter 'url' is required"))?;

    let reference = VaultReference::parse(&url)?;
    let plaintext = state.vault.fetch_plaintext(&reference).await?;

    Ok((
        [
            (header::CONTENT_TYPE, IMAGE_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        plaintext,
    ))
}

/// POST /api/vault/documents - Encrypt and store an uploaded document
///
/// Without a `folder` field the document lands in the application folder.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file = None;
    let mut folder = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Could not read file: {}", e)))?;
                file = Some(bytes);
            }
            Some(FOLDER_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Could not read folder: {}", e)))?;
                folder = Some(text);
            }
            _ => {}
        }
    }

    let file = file
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Field '{}' is required", FILE_FIELD)))?;
    let folder = folder.unwrap_or_else(|| APPLICATION_FOLDER.to_string());

    let stored = state.vault.store(&file, &folder).await?;

    Ok((
        StatusCode::CREATED,
        Json(StoredDocumentResponse {
            url: stored.into_inner(),
        }),
    ))
}
