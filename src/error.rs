//! Error types for the reveal widget.

use thiserror::Error;

/// Result type alias for reveal operations.
pub type Result<T> = std::result::Result<T, RevealError>;

/// Errors surfaced to callers of the reveal widget.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// A run was requested with an empty candidate list.
    #[error("cannot reveal from an empty candidate list")]
    NoCandidates,

    /// Preferences could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        RevealError::Storage(err.to_string())
    }
}
