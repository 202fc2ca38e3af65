//! Core types and error handling for dirmarker
//!
//! This module contains the data types shared by the rule engine, the
//! classifier, the marker writer and the tree walker.

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{DirmarkerError, Result};
pub use types::{DirectoryNode, MarkerKind, ParseWarning, Warning};
