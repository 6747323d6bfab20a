//! Error types for the geometry API.

use serde::{Deserialize, Serialize};

/// Failure modes of the affine math layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum GeomError {
    /// Matrix cannot be inverted (determinant is effectively zero).
    #[error("singular matrix: determinant {det} is below inversion tolerance")]
    SingularMatrix { det: f64 },
}
