//! HTTP DTOs for face verification.

use serde::{Deserialize, Serialize};

use crate::domain::verification::VerificationResult;

/// Multipart field carrying the live capture.
pub const LIVE_IMAGE_FIELD: &str = "live_image";

/// Multipart field carrying the vault reference or legacy URL.
pub const REFERENCE_FIELD: &str = "reference_url";

/// Response body of `POST /api/verify-face`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyFaceResponse {
    pub matched: bool,
    /// Cosine similarity of the two embeddings; absent when no comparison ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    pub message: String,
    /// Failure code when the verification could not be scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<&VerificationResult> for VerifyFaceResponse {
    fn from(result: &VerificationResult) -> Self {
        Self {
            matched: result.matched,
            distance: result.score,
            message: result.message(),
            code: result.failure.as_ref().map(|f| f.code().to_string()),
        }
    }
}
