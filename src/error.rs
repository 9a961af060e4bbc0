//! Error types for the tokenization pipeline.

use thiserror::Error;

/// Result type for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;

/// Errors surfaced by the core pipeline.
///
/// Edge truncation at `max_edges` is deliberately *not* represented here; it
/// is a documented lossy policy reported through
/// [`crate::tokens::AssemblyStats`].
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Malformed single-graph input: non-square adjacency, mismatched
    /// feature rows, or a zero embedding width.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Eigendecomposition failed to converge within the iteration budget.
    #[error("eigendecomposition failed to converge within {max_iterations} iterations")]
    NumericalDegenerate { max_iterations: usize },

    /// Batch inputs with inconsistent node or feature dimensions.
    #[error(
        "graph {index}: expected {expected_nodes} nodes x {expected_features} features, \
         got {actual_nodes} x {actual_features}"
    )]
    ShapeMismatch {
        index: usize,
        expected_nodes: usize,
        expected_features: usize,
        actual_nodes: usize,
        actual_features: usize,
    },
}

impl TokenizerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
