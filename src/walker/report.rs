//! Run results and statistics

use crate::core::types::{MarkerKind, Warning};
use std::path::PathBuf;
use std::time::Duration;

/// A directory that received (or, in dry-run mode, would receive) a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedDirectory {
    pub path: PathBuf,
    /// Full path of the marker file
    pub marker: PathBuf,
    pub kind: MarkerKind,
}

/// Event reported while walking
#[derive(Debug, Clone, Copy)]
pub enum WalkEvent<'a> {
    /// Marker file written
    Marked(&'a MarkedDirectory),
    /// Marker file that a dry run would write
    Planned(&'a MarkedDirectory),
    Warning(&'a Warning),
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub directories_visited: usize,
    /// Directories skipped because they already carried a marker
    pub already_marked: usize,
    /// Directories skipped as excluded paths or repository metadata
    pub pruned: usize,
    pub markers_created: usize,
    pub markers_planned: usize,
}

/// Result of walking one or more roots
#[derive(Debug, Default)]
pub struct RunReport {
    /// Canonical roots that were walked
    pub roots: Vec<PathBuf>,
    pub dry_run: bool,
    /// Created markers, or planned ones in dry-run mode
    pub marked: Vec<MarkedDirectory>,
    /// Non-fatal problems in the order they happened
    pub warnings: Vec<Warning>,
    pub stats: WalkStats,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of markers written, or that would be written in dry-run mode
    pub fn marker_count(&self) -> usize {
        self.marked.len()
    }

    pub fn count_of(&self, kind: MarkerKind) -> usize {
        self.marked.iter().filter(|m| m.kind == kind).count()
    }
}
