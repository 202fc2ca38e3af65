//! Error types for dirmarker
//!
//! Only conditions that abort a whole run are errors. Problems confined to a
//! single directory or a single ignore-file line are reported as
//! [`Warning`](crate::core::types::Warning)s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dirmarker operations
#[derive(Error, Debug)]
pub enum DirmarkerError {
    /// Root-related errors
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Root is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    /// Path is outside the tree being inspected
    #[error("Path {path} is not inside {root}")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DirmarkerError {
    /// Create a new root not found error
    pub fn root_not_found(path: PathBuf) -> Self {
        Self::RootNotFound { path }
    }

    /// Create a new root not a directory error
    pub fn root_not_directory(path: PathBuf) -> Self {
        Self::RootNotDirectory { path }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }
}

/// Result type alias for dirmarker operations
pub type Result<T> = std::result::Result<T, DirmarkerError>;
