//! Error types for PWAAT Core
//!
//! Provides a unified error type for workspace load, save and scaffold operations.

use crate::workspace::ExtractorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for PWAAT Core operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Unified error type for PWAAT Core
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Missing file or directory
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed workspace envelope or JSON document
    #[error("Corrupt file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Loaded workspace is not of the expected extractor kind
    #[error("Workspace kind mismatch: expected {expected}, got {got}")]
    KindMismatch {
        expected: ExtractorKind,
        got: ExtractorKind,
    },

    /// I/O error (write/create failure, permission denied)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding failed before anything was written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Operation not possible in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl WorkspaceError {
    /// Create a not found error
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        WorkspaceError::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a corrupt file error
    pub fn corrupt(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        WorkspaceError::Corrupt {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        WorkspaceError::InvalidOperation(msg.into())
    }

    /// Wrap an I/O error with a short description of what failed
    pub(crate) fn io_context(err: std::io::Error, what: &str, path: &Path) -> Self {
        WorkspaceError::Io(std::io::Error::new(
            err.kind(),
            format!("{} {}: {}", what, path.display(), err),
        ))
    }
}

impl From<serde_json::Error> for WorkspaceError {
    fn from(err: serde_json::Error) -> Self {
        WorkspaceError::Serialization(err.to_string())
    }
}
