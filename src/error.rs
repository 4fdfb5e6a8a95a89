//! Error types for the ranking pipeline.

use std::path::PathBuf;

/// Top-level error type for a ranking run.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    /// Missing credential or invalid configuration. Raised before any
    /// network request is made.
    #[error("config error: {0}")]
    Config(String),

    /// Harvesting from the search API failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] rank_search::SearchError),

    /// Creating an output directory or writing an artifact failed.
    #[error("write error: {}: {message}", path.display())]
    Write {
        /// File or directory that could not be written.
        path: PathBuf,
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RankError>;
