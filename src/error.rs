//! Error taxonomy for the factorization engine.
//!
//! Only structural problems are errors. Numerical degeneracy (rank deficiency,
//! near-zero pivots) is absorbed by the algorithms and never reported here.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, QrError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QrError {
    /// A factorization was requested for a matrix with no rows or no columns.
    #[error("Matrix should have rows > 0 and cols > 0, got {rows}x{cols}")]
    EmptyMatrix { rows: usize, cols: usize },

    /// Right-hand side row count does not match the factored matrix.
    #[error("Dimension mismatch: expected {expected} rows, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Q and R have not been populated yet.
    #[error("No factorization computed yet; call a factorization method first")]
    NotFactorized,

    /// The regularised triangular factor could still not be inverted.
    #[error("Triangular factor is singular even after regularization")]
    SingularFactor,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Diagnostics could not be rendered as JSON.
    #[error("Failed to serialize diagnostics: {0}")]
    Serialization(String),
}

impl QrError {
    pub fn config(message: impl Into<String>) -> Self {
        QrError::InvalidConfig(message.into())
    }
}
