//! Error types for the timeline core.

use serde::{Deserialize, Serialize};
use stagekit_api_core::{DataValueKind, GeomError};

/// Typed failures surfaced by timeline operations.
///
/// Structural invariants (depth contiguity, span contiguity) are repaired
/// internally on every mutating call and never appear here; these variants
/// cover malformed *input* and out-of-range references only.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StageError {
    /// Negative depth passed across the script boundary
    #[error("invalid depth: {depth}")]
    InvalidDepth { depth: i64 },

    /// Out-of-range frame/layer/timeline/document index
    #[error("index {index} is out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    /// Custom ease curve that cannot be evaluated
    #[error("malformed ease curve: {reason}")]
    MalformedEaseCurve { reason: String },

    /// Sound envelope with bad marks, levels, or limits
    #[error("invalid sound envelope: {reason}")]
    InvalidEnvelope { reason: String },

    /// Persistent-data entry exists with a different kind than requested
    #[error("value type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: DataValueKind,
        actual: DataValueKind,
    },

    /// Affine math failure (singular matrix inversion)
    #[error(transparent)]
    Geometry(#[from] GeomError),
}

impl StageError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDepth { .. } | Self::InvalidIndex { .. } => "structure",
            Self::MalformedEaseCurve { .. } | Self::InvalidEnvelope { .. } => "validation",
            Self::TypeMismatch { .. } => "data",
            Self::Geometry(_) => "geometry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let e = StageError::InvalidDepth { depth: -3 };
        assert_eq!(e.category(), "structure");
        let e = StageError::MalformedEaseCurve {
            reason: "x".into(),
        };
        assert_eq!(e.category(), "validation");
    }

    #[test]
    fn serde_round_trip() {
        let e = StageError::InvalidIndex { index: 9, len: 4 };
        let s = serde_json::to_string(&e).unwrap();
        let back: StageError = serde_json::from_str(&s).unwrap();
        assert_eq!(e, back);
    }
}
