//! Mock face backend for testing.
//!
//! Images are matched by exact bytes against registered fixtures, so tests
//! control precisely which faces (and embeddings) each image yields.
//! Unregistered bytes behave like an undecodable image.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::verification::{BoundingBox, DetectedFace, FaceEmbedding};
use crate::ports::{FaceBackendError, FaceEmbeddingBackend};

#[derive(Default)]
struct MockState {
    fixtures: HashMap<Vec<u8>, Vec<DetectedFace>>,
    warm_up_error: Option<FaceBackendError>,
    next_error: Option<FaceBackendError>,
    detect_calls: usize,
}

/// Deterministic in-process backend.
#[derive(Clone, Default)]
pub struct MockFaceBackend {
    inner: Arc<Mutex<MockState>>,
}

impl MockFaceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers the faces returned for an exact image.
    pub fn register(&self, image: &[u8], faces: Vec<DetectedFace>) {
        self.state().fixtures.insert(image.to_vec(), faces);
    }

    /// Registers an image holding one face with the given embedding.
    pub fn register_single(&self, image: &[u8], embedding: Vec<f32>) -> Result<(), FaceBackendError> {
        let face = single_face(embedding)?;
        self.register(image, vec![face]);
        Ok(())
    }

    pub fn set_warm_up_error(&self, error: FaceBackendError) {
        self.state().warm_up_error = Some(error);
    }

    /// Fails the next `detect_faces` call.
    pub fn fail_next(&self, error: FaceBackendError) {
        self.state().next_error = Some(error);
    }

    pub fn detect_calls(&self) -> usize {
        self.state().detect_calls
    }
}

/// A centred 100x100 face with `embedding`.
pub fn single_face(embedding: Vec<f32>) -> Result<DetectedFace, FaceBackendError> {
    let embedding =
        FaceEmbedding::new(embedding).map_err(|e| FaceBackendError::Inference(e.to_string()))?;
    Ok(DetectedFace {
        bbox: BoundingBox::new(50.0, 50.0, 150.0, 150.0),
        embedding,
        detection_score: Some(0.99),
    })
}

#[async_trait]
impl FaceEmbeddingBackend for MockFaceBackend {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn warm_up(&self) -> Result<(), FaceBackendError> {
        match self.state().warm_up_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<DetectedFace>, FaceBackendError> {
        let mut state = self.state();
        state.detect_calls += 1;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        state
            .fixtures
            .get(image)
            .cloned()
            .ok_or_else(|| FaceBackendError::UndecodableImage("unregistered fixture".to_string()))
    }
}
