//! Verification module - Face embeddings and match decisions.

mod embedding;
mod engine;
mod policy;
mod result;

pub use embedding::{most_prominent, BoundingBox, DetectedFace, EmbeddingError, FaceEmbedding};
pub use engine::{EmbedOutcome, EngineError, EngineInitError, FaceEmbeddingEngine};
pub use policy::{MatchPolicy, DEFAULT_MATCH_THRESHOLD};
pub use result::{FaceSide, VerificationFailure, VerificationResult};
