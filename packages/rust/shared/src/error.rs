//! Error types for malldir.
//!
//! Library crates use [`MallDirError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all malldir operations.
#[derive(Debug, thiserror::Error)]
pub enum MallDirError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A structural element required in a source payload is missing.
    ///
    /// This is the only error the directory pipeline itself produces; a
    /// partially built directory is never returned in its place.
    #[error("malformed source: {message}")]
    MalformedSource { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MallDirError>;

impl MallDirError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-source error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSource {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the source payload itself is unusable.
    pub fn is_malformed_source(&self) -> bool {
        matches!(self, Self::MalformedSource { .. })
    }
}
