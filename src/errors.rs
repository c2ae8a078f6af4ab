//! Error types for preflight validation runs.
//!
//! Only a small part of what can go wrong during a run is actually fatal.
//! Missing or malformed documentation degrades the documentation model and is
//! surfaced to a human as a clarification question; an unreadable file or
//! directory aborts the run because "could not look" must never be reported
//! as "found nothing".
//!
//! # Categories
//!
//! - `MissingInput`: a required document or source path does not exist
//! - `MalformedDocument`: a document exists but a required pattern is absent
//! - `Io`: the project could not be read at all (permissions, broken files)
//! - `Config`: the `.preflight.toml` file is unreadable or invalid
//! - `Pattern`: a glob or regular expression supplied by configuration is invalid
//!
//! # Example
//!
//! ```rust
//! use preflight::errors::PreflightError;
//!
//! let missing = PreflightError::missing_input("docs/security/pii_masking.md");
//! assert!(!missing.is_fatal());
//!
//! let io = PreflightError::io_with_path("permission denied", "src/views.py");
//! assert!(io.is_fatal());
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = PreflightError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreflightError {
    /// A required document or source path is absent.
    #[error("Missing input: {path}")]
    MissingInput { path: PathBuf },

    /// A document exists but does not contain a pattern the model needs.
    #[error("Malformed document {path}: {message}")]
    MalformedDocument { path: PathBuf, message: String },

    /// Source or documentation could not be read.
    #[error("I/O error: {message}{}", .path.as_ref().map(|p| format!(" (path: {})", p.display())).unwrap_or_default())]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Configuration file problems.
    #[error("Config error: {message}{}", .path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid glob or regular expression.
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

impl PreflightError {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the current invocation.
    ///
    /// `MissingInput` and `MalformedDocument` degrade the model instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MissingInput { .. } | Self::MalformedDocument { .. }
        )
    }

    /// Convert an `io::Error` for a specific path, mapping not-found to `MissingInput`.
    pub fn from_io(err: &io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if err.kind() == io::ErrorKind::NotFound {
            Self::MissingInput { path }
        } else {
            Self::Io {
                message: err.to_string(),
                path: Some(path),
            }
        }
    }
}

impl From<regex::Error> for PreflightError {
    fn from(err: regex::Error) -> Self {
        Self::pattern(String::new(), err.to_string())
    }
}
