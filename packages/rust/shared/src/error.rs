//! Error types for menucat.
//!
//! Library crates use [`MenuCatError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! The extraction engine itself never returns these: a page that yields
//! nothing is an empty catalog, not an error. They cover the I/O around it.

use std::path::PathBuf;

/// Top-level error type for all menucat operations.
#[derive(Debug, thiserror::Error)]
pub enum MenuCatError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Snapshot could not be read as a document.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (schema mismatch, invalid value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Writing JSON/CSV/manifest output failed.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MenuCatError>;

impl MenuCatError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
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
