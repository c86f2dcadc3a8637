//! Error types for detmax.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur at the fallible seams of the crate: file I/O,
/// input parsing, and matrix inversion.
#[derive(Debug, Error)]
pub enum SelectError {
    /// I/O error (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed matrix file (bad header, truncated body, unparsable number).
    #[error("malformed matrix file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// The kernel matrix is singular where an inverse is required.
    #[error("kernel matrix is singular")]
    SingularMatrix,

    /// Invalid parameter value (CLI flags, configuration).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl SelectError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for detmax operations.
pub type Result<T> = std::result::Result<T, SelectError>;
