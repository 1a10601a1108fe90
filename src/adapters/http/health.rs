//! Liveness and capability report.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::vault::KeyProvenance;

/// Where the vault key came from, or `missing` when encryption is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionStatus {
    Configured,
    Ephemeral,
    Missing,
}

impl From<Option<KeyProvenance>> for EncryptionStatus {
    fn from(provenance: Option<KeyProvenance>) -> Self {
        match provenance {
            Some(KeyProvenance::Configured) => Self::Configured,
            Some(KeyProvenance::Ephemeral) => Self::Ephemeral,
            None => Self::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub face_engine_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_model: Option<String>,
    pub match_threshold: f32,
    pub encryption: EncryptionStatus,
    pub broadcasts_enabled: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        face_engine_available: state.face_engine.is_some(),
        face_model: state.face_engine.as_ref().map(|e| e.model_name().to_string()),
        match_threshold: state.match_policy.threshold(),
        encryption: EncryptionStatus::from(state.vault.key_provenance()),
        broadcasts_enabled: state.broadcasts.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_maps_to_status() {
        assert_eq!(EncryptionStatus::from(None), EncryptionStatus::Missing);
        assert_eq!(
            serde_json::to_value(EncryptionStatus::from(Some(KeyProvenance::Ephemeral))).unwrap(),
            "ephemeral"
        );
    }
}
