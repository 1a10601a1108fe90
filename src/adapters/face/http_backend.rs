//! HTTP Face Backend - Client for a face model server.
//!
//! The model server hosts the detection + recognition pack and exposes:
//!
//! - `GET  {base_url}/health` - 200 once weights are loaded
//! - `POST {base_url}/v1/faces` - raw image bytes in, JSON faces out
//!
//! ```text
//! { "faces": [ { "bbox": [x1, y1, x2, y2], "embedding": [..512 floats..], "det_score": 0.98 } ] }
//! ```
//!
//! Error bodies carry `{ "error": "...", "code": "..." }`; `code` values
//! `undecodable_image` and `out_of_memory` are mapped to their own variants.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::verification::{BoundingBox, DetectedFace, FaceEmbedding};
use crate::ports::{FaceBackendError, FaceEmbeddingBackend};

/// Configuration for the model server client.
#[derive(Debug, Clone)]
pub struct HttpFaceBackendConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl HttpFaceBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: "buffalo_l".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Face backend calling a remote model server.
pub struct HttpFaceBackend {
    config: HttpFaceBackendConfig,
    client: Client,
}

impl HttpFaceBackend {
    pub fn new(config: HttpFaceBackendConfig) -> Result<Self, FaceBackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FaceBackendError::Unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn faces_url(&self) -> String {
        format!("{}/v1/faces", self.config.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct FacesResponse {
    #[serde(default)]
    faces: Vec<WireFace>,
}

#[derive(Debug, Deserialize)]
struct WireFace {
    bbox: [f32; 4],
    embedding: Vec<f32>,
    #[serde(default)]
    det_score: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

impl TryFrom<WireFace> for DetectedFace {
    type Error = FaceBackendError;

    fn try_from(face: WireFace) -> Result<Self, Self::Error> {
        let [x1, y1, x2, y2] = face.bbox;
        let embedding = FaceEmbedding::new(face.embedding)
            .map_err(|e| FaceBackendError::Inference(format!("bad embedding: {}", e)))?;
        Ok(DetectedFace {
            bbox: BoundingBox::new(x1, y1, x2, y2),
            embedding,
            detection_score: face.det_score,
        })
    }
}

fn map_transport(e: reqwest::Error) -> FaceBackendError {
    if e.is_timeout() {
        FaceBackendError::Unavailable("model server timed out".to_string())
    } else if e.is_connect() {
        FaceBackendError::Unavailable(format!("cannot reach model server: {}", e))
    } else {
        FaceBackendError::Inference(e.to_string())
    }
}

fn map_error_status(status: StatusCode, body: ErrorBody) -> FaceBackendError {
    let message = if body.error.is_empty() {
        status.to_string()
    } else {
        body.error
    };
    match (status, body.code.as_str()) {
        (_, "out_of_memory") | (StatusCode::INSUFFICIENT_STORAGE, _) => {
            FaceBackendError::ResourceExhausted(message)
        }
        (_, "undecodable_image")
        | (StatusCode::UNPROCESSABLE_ENTITY, _)
        | (StatusCode::UNSUPPORTED_MEDIA_TYPE, _) => FaceBackendError::UndecodableImage(message),
        (StatusCode::SERVICE_UNAVAILABLE, _) => FaceBackendError::Unavailable(message),
        _ => FaceBackendError::Inference(message),
    }
}

#[async_trait]
impl FaceEmbeddingBackend for HttpFaceBackend {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn warm_up(&self) -> Result<(), FaceBackendError> {
        let response = self
            .client
            .get(self.health_url())
            .query(&[("model", self.config.model.as_str())])
            .send()
            .await
            .map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(FaceBackendError::Unavailable(format!(
                "health check returned {}: {}",
                status, body.error
            )));
        }
        Ok(())
    }

    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<DetectedFace>, FaceBackendError> {
        let response = self
            .client
            .post(self.faces_url())
            .query(&[("model", self.config.model.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            let err = map_error_status(status, body);
            tracing::warn!(status = %status, error = %err, "Model server returned an error");
            return Err(err);
        }

        let parsed: FacesResponse = response
            .json()
            .await
            .map_err(|e| FaceBackendError::Inference(format!("malformed model response: {}", e)))?;
        parsed.faces.into_iter().map(DetectedFace::try_from).collect()
    }
}
