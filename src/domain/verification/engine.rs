//! Face embedding engine.
//!
//! A single shared instance is built at startup with [`FaceEmbeddingEngine::init`].
//! When initialization fails the process keeps running without an engine and
//! verification reports "engine unavailable" instead of retrying the model
//! load on every request.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::{most_prominent, FaceEmbedding};
use crate::ports::{FaceBackendError, FaceEmbeddingBackend};

/// Outcome of embedding one image.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedOutcome {
    Found(FaceEmbedding),
    /// No face in the image, or the image did not decode.
    NotFound,
}

/// Startup failure of the engine.
#[derive(Debug, Clone, Error)]
#[error("Face model '{model}' failed to initialize: {reason}")]
pub struct EngineInitError {
    pub model: String,
    pub reason: String,
}

/// Per-call engine failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Could not read image: {0}")]
    Io(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Compute resources exhausted: {0}")]
    ResourceExhausted(String),
}

impl EngineError {
    /// Fatal errors propagate past the verification boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::ResourceExhausted(_))
    }
}

/// Shared face detection + embedding engine.
pub struct FaceEmbeddingEngine {
    backend: Arc<dyn FaceEmbeddingBackend>,
}

impl FaceEmbeddingEngine {
    /// Warms the backend up once.
    pub async fn init(backend: Arc<dyn FaceEmbeddingBackend>) -> Result<Self, EngineInitError> {
        let model = backend.model_name().to_string();
        backend.warm_up().await.map_err(|e| EngineInitError {
            model: model.clone(),
            reason: e.to_string(),
        })?;
        tracing::info!(model = %model, "Face embedding engine ready");
        Ok(Self { backend })
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Embeds the most prominent face of the image at `image_path`.
    pub async fn embed(&self, image_path: &Path) -> Result<EmbedOutcome, EngineError> {
        let image = tokio::fs::read(image_path)
            .await
            .map_err(|e| EngineError::Io(e.to_string()))?;
        self.embed_bytes(&image).await
    }

    /// Embeds the most prominent face of an in-memory image.
    pub async fn embed_bytes(&self, image: &[u8]) -> Result<EmbedOutcome, EngineError> {
        let faces = match self.backend.detect_faces(image).await {
            Ok(faces) => faces,
            Err(FaceBackendError::UndecodableImage(reason)) => {
                tracing::debug!(reason = %reason, "Image did not decode; treating as no face");
                return Ok(EmbedOutcome::NotFound);
            }
            Err(FaceBackendError::ResourceExhausted(reason)) => {
                tracing::error!(reason = %reason, "Face model exhausted compute resources");
                return Err(EngineError::ResourceExhausted(reason));
            }
            Err(e @ (FaceBackendError::Unavailable(_) | FaceBackendError::Inference(_))) => {
                return Err(EngineError::Inference(e.to_string()));
            }
        };

        let detected = faces.len();
        match most_prominent(faces) {
            Some(face) => {
                tracing::debug!(faces = detected, area = face.bbox.area(), "Selected most prominent face");
                Ok(EmbedOutcome::Found(face.embedding))
            }
            None => Ok(EmbedOutcome::NotFound),
        }
    }
}
