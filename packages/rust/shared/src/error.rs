//! Error types for docstitch.
//!
//! Library crates use [`DocstitchError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docstitch operations.
#[derive(Debug, thiserror::Error)]
pub enum DocstitchError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The external HTML-to-PDF renderer could not be located.
    #[error("renderer not found: {message}")]
    RendererNotFound { message: String },

    /// The external renderer ran but reported failure.
    #[error("renderer exited with code {code}:\n{stderr}")]
    Render { code: i32, stderr: String },

    /// Bad input (missing file, malformed option, empty output, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocstitchError>;

impl DocstitchError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a renderer-not-found error from any displayable message.
    pub fn renderer_not_found(msg: impl Into<String>) -> Self {
        Self::RendererNotFound {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
}
