//! dirmarker - keep build output and caches out of backups
//!
//! dirmarker walks a project tree and, for every directory that is excluded
//! by `.gitignore` rules *and* named like build output or a cache, drops a
//! marker file that backup tools honor:
//!
//! - **Ignore marker**: an empty `.deja-dup-ignore` (configurable) in
//!   `node_modules`, `target`, `build`, `dist` and friends
//! - **Cache tag**: a `CACHEDIR.TAG` in any directory whose name contains
//!   `cache`
//!
//! Runs are purely additive and idempotent. Existing markers are never
//! touched and marked directories are never descended into.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dirmarker::{Classifier, MarkerWriter, TreeWalker, WalkOptions};
//! use std::path::PathBuf;
//!
//! let walker = TreeWalker::new(
//!     WalkOptions::default(),
//!     Classifier::default(),
//!     MarkerWriter::default(),
//! );
//! let report = walker.run(&[PathBuf::from("./my-project")])?;
//! for marked in &report.marked {
//!     println!("{}", marked.marker.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod ignore;
pub mod marker;
pub mod walker;

// Re-export commonly used types
pub use crate::core::{
    error::{DirmarkerError, Result},
    types::{DirectoryNode, MarkerKind, ParseWarning, Warning},
};

pub use ignore::{IgnoreChecker, IgnoreResult, IgnoreSources, Rule, RuleScope, ScopeChain};

pub use marker::{Classifier, MarkerWriter, WriteOutcome};

pub use walker::{RunReport, TreeWalker, WalkOptions};

/// Current version of dirmarker
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
