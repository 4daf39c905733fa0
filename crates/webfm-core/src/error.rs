//! Error types for `webfm-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message. Workflow-level operations convert these into a
/// single notification before returning them.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input rejected on the client before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The request could not complete (network unreachable, bad response body).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-zero envelope code.
    #[error("{message}")]
    Backend { code: i32, message: String },

    /// A remote path contains a forbidden segment.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// A local file does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access a local path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns `true` for errors detected on the client without a request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidPath(_))
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Transport(err.to_string())
    }
}

/// Convenience alias used throughout `webfm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
