//! Verification outcomes.

use serde::Serialize;
use std::fmt;

/// Which image a per-side failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSide {
    Live,
    Reference,
}

impl fmt::Display for FaceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceSide::Live => write!(f, "live"),
            FaceSide::Reference => write!(f, "reference"),
        }
    }
}

/// Reported (non-fatal) reasons a verification did not produce a score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    EngineUnavailable,
    InvalidInput(String),
    InvalidReference(String),
    EncryptionUnavailable,
    DownloadFailed(String),
    DecryptionFailed(String),
    FaceNotDetected(FaceSide),
    Processing(String),
}

impl VerificationFailure {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EngineUnavailable => "ENGINE_UNAVAILABLE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::EncryptionUnavailable => "ENCRYPTION_UNAVAILABLE",
            Self::DownloadFailed(_) => "DOWNLOAD_FAILED",
            Self::DecryptionFailed(_) => "DECRYPTION_FAILED",
            Self::FaceNotDetected(_) => "FACE_NOT_DETECTED",
            Self::Processing(_) => "PROCESSING_FAILED",
        }
    }

    /// Caller-facing message. Internal detail stays in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::EngineUnavailable => "Face engine unavailable".to_string(),
            Self::InvalidInput(reason) => format!("Invalid input: {}", reason),
            Self::InvalidReference(_) => "Reference image locator is invalid".to_string(),
            Self::EncryptionUnavailable => "Reference image cannot be decrypted on this server".to_string(),
            Self::DownloadFailed(_) => "Reference image could not be downloaded".to_string(),
            Self::DecryptionFailed(_) => "Reference image could not be decrypted".to_string(),
            Self::FaceNotDetected(side) => format!("Face not detected in {} image", side),
            Self::Processing(_) => "Face comparison failed".to_string(),
        }
    }
}

/// Result of a single verify call.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub matched: bool,
    /// Cosine similarity in `[-1, 1]`, absent when no comparison ran.
    pub score: Option<f32>,
    pub failure: Option<VerificationFailure>,
}

impl VerificationResult {
    pub fn scored(score: f32, matched: bool) -> Self {
        Self {
            matched,
            score: Some(score),
            failure: None,
        }
    }

    pub fn failed(failure: VerificationFailure) -> Self {
        Self {
            matched: false,
            score: None,
            failure: Some(failure),
        }
    }

    pub fn message(&self) -> String {
        match (&self.failure, self.matched) {
            (Some(failure), _) => failure.message(),
            (None, true) => "Faces match".to_string(),
            (None, false) => "Faces do not match".to_string(),
        }
    }
}
