//! Face embeddings, bounding boxes and prominence selection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing or comparing embeddings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    #[error("Embedding is empty")]
    Empty,

    #[error("Embedding contains a non-finite value")]
    NonFinite,

    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding has zero norm")]
    ZeroNorm,
}

/// A fixed-length vector describing one face. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEmbedding(Vec<f32>);

impl FaceEmbedding {
    pub fn new(values: Vec<f32>) -> Result<Self, EmbeddingError> {
        if values.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite);
        }
        Ok(Self(values))
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Cosine similarity in `[-1, 1]`.
    ///
    /// Accumulates in f64 so 512-d vectors do not drift past the bounds.
    pub fn cosine_similarity(&self, other: &FaceEmbedding) -> Result<f32, EmbeddingError> {
        if self.dimension() != other.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                left: self.dimension(),
                right: other.dimension(),
            });
        }

        let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let (a, b) = (f64::from(*a), f64::from(*b));
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            return Err(EmbeddingError::ZeroNorm);
        }

        let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
        Ok(similarity.clamp(-1.0, 1.0) as f32)
    }
}

/// Axis-aligned face box in pixel coordinates `(x1, y1)`-`(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Area, zero for inverted or degenerate boxes.
    pub fn area(&self) -> f32 {
        let width = (self.x2 - self.x1).max(0.0);
        let height = (self.y2 - self.y1).max(0.0);
        let area = width * height;
        if area.is_finite() {
            area
        } else {
            0.0
        }
    }
}

/// One face reported by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    pub bbox: BoundingBox,
    pub embedding: FaceEmbedding,
    pub detection_score: Option<f32>,
}

/// Picks the face with the largest bounding-box area.
///
/// Equal areas keep the earlier face, so the choice is reproducible for a
/// given detector output.
pub fn most_prominent(faces: Vec<DetectedFace>) -> Option<DetectedFace> {
    let mut best: Option<DetectedFace> = None;
    for face in faces {
        let replace = match &best {
            None => true,
            Some(current) => face.bbox.area() > current.bbox.area(),
        };
        if replace {
            best = Some(face);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> FaceEmbedding {
        FaceEmbedding::new(values.to_vec()).unwrap()
    }

    fn face(bbox: BoundingBox, marker: f32) -> DetectedFace {
        DetectedFace {
            bbox,
            embedding: emb(&[marker, 1.0]),
            detection_score: Some(0.9),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Construction
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn rejects_empty_and_non_finite() {
        assert_eq!(FaceEmbedding::new(vec![]).unwrap_err(), EmbeddingError::Empty);
        assert_eq!(FaceEmbedding::new(vec![1.0, f32::NAN]).unwrap_err(), EmbeddingError::NonFinite);
        assert_eq!(
            FaceEmbedding::new(vec![f32::INFINITY]).unwrap_err(),
            EmbeddingError::NonFinite
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Cosine similarity
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn identical_vectors_score_one() {
        let a = emb(&[0.3, -0.2, 0.9]);
        assert!((a.cosine_similarity(&a).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let a = emb(&[1.0, 2.0]);
        let b = emb(&[-1.0, -2.0]);
        assert!((a.cosine_similarity(&b).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = emb(&[1.0, 0.0]);
        let b = emb(&[0.0, 5.0]);
        assert!(a.cosine_similarity(&b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn similarity_ignores_magnitude() {
        let a = emb(&[1.0, 1.0]);
        let b = emb(&[10.0, 10.0]);
        assert!((a.cosine_similarity(&b).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dimension_mismatch_is_error() {
        let err = emb(&[1.0]).cosine_similarity(&emb(&[1.0, 2.0])).unwrap_err();
        assert_eq!(err, EmbeddingError::DimensionMismatch { left: 1, right: 2 });
    }

    #[test]
    fn zero_vector_is_error() {
        let err = emb(&[0.0, 0.0]).cosine_similarity(&emb(&[1.0, 0.0])).unwrap_err();
        assert_eq!(err, EmbeddingError::ZeroNorm);
    }

    // ══════════════════════════════════════════════════════════════
    // Prominence
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn area_of_inverted_box_is_zero() {
        assert_eq!(BoundingBox::new(10.0, 10.0, 5.0, 20.0).area(), 0.0);
    }

    #[test]
    fn picks_largest_box_not_first() {
        let faces = vec![
            face(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 1.0),
            face(BoundingBox::new(0.0, 0.0, 50.0, 40.0), 2.0),
            face(BoundingBox::new(0.0, 0.0, 20.0, 20.0), 3.0),
        ];
        let chosen = most_prominent(faces).unwrap();
        assert_eq!(chosen.embedding.as_slice()[0], 2.0);
    }

    #[test]
    fn equal_areas_keep_earliest() {
        let faces = vec![
            face(BoundingBox::new(0.0, 0.0, 10.0, 20.0), 1.0),
            face(BoundingBox::new(5.0, 5.0, 25.0, 15.0), 2.0),
        ];
        let chosen = most_prominent(faces).unwrap();
        assert_eq!(chosen.embedding.as_slice()[0], 1.0);
    }

    #[test]
    fn no_faces_yields_none() {
        assert!(most_prominent(Vec::new()).is_none());
    }
}
