//! Coloring error types.

use crate::sat::solver::BackendError;

/// Errors raised while building a graph or querying a coloring problem.
#[derive(Debug, thiserror::Error)]
pub enum ColoringError {
    /// Out-of-range node or color index, or an unusable color count or backend.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An edge passed with its larger endpoint first.
    #[error("edge ({from}, {to}) is not oriented smaller endpoint first")]
    InvalidOrientation {
        /// First endpoint as given.
        from: usize,
        /// Second endpoint as given.
        to: usize,
    },

    /// The backend refused a variable or clause.
    #[error("SAT backend exhausted: {0}")]
    BackendExhausted(#[from] BackendError),

    /// Writing an exported encoding failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for coloring operations.
pub type Result<T> = std::result::Result<T, ColoringError>;
