//! Errors surfaced to callers of the caller-level entry points.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Failures outside the parse core: reading input, writing outputs, options.
pub enum Md2mapError {
    /// Reading or writing `path` failed.
    #[error("{path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The input path does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// A configuration file could not be parsed.
    #[error("invalid configuration in {path}: {message}")]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// An option value is not one of the accepted choices.
    #[error("invalid value '{value}' for {option} (expected one of: {expected})")]
    InvalidOption {
        /// Option name.
        option: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values, comma separated.
        expected: &'static str,
    },
    /// MAP.json serialisation failed.
    #[error("failed to serialise map: {0}")]
    Json(#[from] serde_json::Error),
}

impl Md2mapError {
    #[must_use]
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for caller-level operations.
pub type Result<T> = std::result::Result<T, Md2mapError>;
