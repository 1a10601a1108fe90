//! Match threshold policy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Default cosine-similarity threshold.
///
/// Tuned loosely for mobile camera captures against ID photos; deployments
/// should calibrate it against a labelled dataset.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.50;

/// Decides whether a similarity score counts as a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    threshold: f32,
}

impl MatchPolicy {
    /// Creates a policy; the threshold must lie in `[-1, 1]`.
    pub fn new(threshold: f32) -> Result<Self, ValidationError> {
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(ValidationError::invalid_format(
                "match_threshold",
                format!("must be within [-1, 1], got {}", threshold),
            ));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Strictly greater than the threshold matches.
    pub fn is_match(&self, similarity: f32) -> bool {
        similarity > self.threshold
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}
