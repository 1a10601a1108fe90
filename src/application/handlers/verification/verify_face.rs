//! VerifyFaceHandler - Compares a live capture against a stored reference photo.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::vault::{DocumentVault, VaultError, VaultReference};
use crate::domain::verification::{
    EmbedOutcome, EngineError, FaceEmbedding, FaceEmbeddingEngine, FaceSide, MatchPolicy,
    VerificationFailure, VerificationResult,
};

/// Command to verify a live face image against a reference locator.
#[derive(Debug, Clone)]
pub struct VerifyFaceCommand {
    /// Encoded live capture (JPEG/PNG).
    pub live_image: Vec<u8>,
    /// Vault reference (`.enc`) or legacy plaintext URL.
    pub reference_locator: String,
}

/// Fatal failure; only raised when the model cannot acquire compute.
#[derive(Debug, Clone, Error)]
#[error("Face verification aborted: {0}")]
pub struct VerificationAborted(pub String);

enum StepError {
    Reported(VerificationFailure),
    Fatal(String),
}

impl From<VaultError> for StepError {
    fn from(err: VaultError) -> Self {
        let failure = match err {
            VaultError::InvalidReference(reason) => VerificationFailure::InvalidReference(reason),
            VaultError::EncryptionUnavailable => VerificationFailure::EncryptionUnavailable,
            VaultError::DownloadFailed(reason) => VerificationFailure::DownloadFailed(reason),
            VaultError::DecryptionFailed(reason) => VerificationFailure::DecryptionFailed(reason),
            other => VerificationFailure::Processing(other.to_string()),
        };
        StepError::Reported(failure)
    }
}

/// Handler for face verification.
///
/// Every per-request failure becomes a reported [`VerificationResult`].
/// Temp files live in scoped guards inside `run`, so they are gone before
/// `handle` returns on every path.
pub struct VerifyFaceHandler {
    vault: Arc<DocumentVault>,
    engine: Option<Arc<FaceEmbeddingEngine>>,
    policy: MatchPolicy,
}

impl VerifyFaceHandler {
    /// `engine` is `None` when the model failed to initialize at startup.
    pub fn new(
        vault: Arc<DocumentVault>,
        engine: Option<Arc<FaceEmbeddingEngine>>,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            vault,
            engine,
            policy,
        }
    }

    pub fn engine_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub async fn handle(&self, cmd: VerifyFaceCommand) -> Result<VerificationResult, VerificationAborted> {
        match self.run(cmd).await {
            Ok(result) => {
                tracing::info!(
                    matched = result.matched,
                    score = result.score,
                    threshold = self.policy.threshold(),
                    "Face verification completed"
                );
                Ok(result)
            }
            Err(StepError::Reported(failure)) => {
                tracing::info!(code = failure.code(), detail = ?failure, "Face verification not scored");
                Ok(VerificationResult::failed(failure))
            }
            Err(StepError::Fatal(reason)) => {
                tracing::error!(reason = %reason, "Face verification aborted");
                Err(VerificationAborted(reason))
            }
        }
    }

    async fn run(&self, cmd: VerifyFaceCommand) -> Result<VerificationResult, StepError> {
        let engine = self
            .engine
            .as_ref()
            .ok_or(StepError::Reported(VerificationFailure::EngineUnavailable))?;

        if cmd.live_image.is_empty() {
            return Err(StepError::Reported(VerificationFailure::InvalidInput(
                "live image is empty".to_string(),
            )));
        }
        let reference = VaultReference::parse(&cmd.reference_locator)?;

        let live_file = self.vault.write_temp(cmd.live_image).await?;
        let reference_file = self.vault.retrieve_to_temp(&reference).await?;

        let live = embed_side(engine, live_file.path(), FaceSide::Live).await?;
        let stored = embed_side(engine, reference_file.path(), FaceSide::Reference).await?;

        let score = live
            .cosine_similarity(&stored)
            .map_err(|e| StepError::Reported(VerificationFailure::Processing(e.to_string())))?;

        Ok(VerificationResult::scored(score, self.policy.is_match(score)))
    }
}

async fn embed_side(
    engine: &FaceEmbeddingEngine,
    path: &Path,
    side: FaceSide,
) -> Result<FaceEmbedding, StepError> {
    match engine.embed(path).await {
        Ok(EmbedOutcome::Found(embedding)) => Ok(embedding),
        Ok(EmbedOutcome::NotFound) => Err(StepError::Reported(VerificationFailure::FaceNotDetected(side))),
        Err(err @ EngineError::ResourceExhausted(_)) => Err(StepError::Fatal(err.to_string())),
        Err(err) => Err(StepError::Reported(VerificationFailure::Processing(format!(
            "{} image: {}",
            side, err
        )))),
    }
}
