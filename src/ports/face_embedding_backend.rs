//! Face Embedding Backend Port - Detection plus embedding inference.
//!
//! The backend wraps a pretrained detection-and-recognition model (an
//! InsightFace `buffalo_l` pack served by a model server in production).
//! It reports every face it sees; choosing the most prominent one is a
//! domain rule and lives in `domain::verification`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::verification::DetectedFace;

/// Port for face detection and embedding inference.
#[async_trait]
pub trait FaceEmbeddingBackend: Send + Sync {
    /// Human-readable model identifier, used in logs and health output.
    fn model_name(&self) -> &str;

    /// Loads or pings the model once at startup.
    ///
    /// Failure here degrades verification to "engine unavailable".
    async fn warm_up(&self) -> Result<(), FaceBackendError>;

    /// Runs detection and embedding on an encoded image (JPEG/PNG bytes).
    ///
    /// Returns an empty vector when the image decodes but holds no face.
    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<DetectedFace>, FaceBackendError>;
}

/// Errors from the inference boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaceBackendError {
    /// The bytes are not a decodable image.
    #[error("Image could not be decoded: {0}")]
    UndecodableImage(String),

    /// The model server cannot be reached or refuses work.
    #[error("Face model unavailable: {0}")]
    Unavailable(String),

    /// Inference ran but produced an unusable answer.
    #[error("Face inference failed: {0}")]
    Inference(String),

    /// The model ran out of memory or crashed.
    #[error("Face model exhausted compute resources: {0}")]
    ResourceExhausted(String),
}
