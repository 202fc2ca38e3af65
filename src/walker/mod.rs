//! Tree walker that finds ignored build and cache directories and marks them
//!
//! The walk is a depth-first pre-order traversal driven by `walkdir`, so
//! deep trees never grow the call stack. Rule scopes are pushed as
//! directories with ignore files are entered and unwound by depth when the
//! traversal moves on. Symbolic links are never followed, and a directory
//! that carries a marker is never entered.

pub mod report;

pub use report::{MarkedDirectory, RunReport, WalkEvent, WalkStats};

use crate::core::error::{DirmarkerError, Result};
use crate::core::types::{DirectoryNode, MarkerKind, Warning};
use crate::ignore::checker::ScopeChain;
use crate::ignore::parser::{IgnoreSources, RuleScope};
use crate::marker::classifier::Classifier;
use crate::marker::writer::{MarkerWriter, WriteOutcome};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Traversal settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub sources: IgnoreSources,
    /// Subtrees that are never entered
    pub exclude: Vec<PathBuf>,
    /// Never enter `.git` directories
    pub skip_git_dir: bool,
    /// Report markers instead of writing them
    pub dry_run: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            sources: IgnoreSources::default(),
            exclude: Vec::new(),
            skip_git_dir: true,
            dry_run: false,
        }
    }
}

/// Walks directory trees and writes markers into qualifying directories
pub struct TreeWalker {
    options: WalkOptions,
    classifier: Classifier,
    writer: MarkerWriter,
    progress_callback: Option<Box<dyn Fn(&WalkEvent<'_>) + Send + Sync>>,
}

impl TreeWalker {
    pub fn new(options: WalkOptions, classifier: Classifier, writer: MarkerWriter) -> Self {
        Self {
            options,
            classifier,
            writer,
            progress_callback: None,
        }
    }

    /// Set callback for markers and warnings as they happen
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&WalkEvent<'_>) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Walk every root in turn
    ///
    /// All roots are validated before anything is written; an invalid root
    /// aborts the run. Everything else is collected as warnings.
    pub fn run(&self, roots: &[PathBuf]) -> Result<RunReport> {
        let start_time = Instant::now();
        let roots = roots
            .iter()
            .map(|root| validate_root(root))
            .collect::<Result<Vec<_>>>()?;
        let exclude = self.canonical_excludes();

        let mut report = RunReport::new(self.options.dry_run);
        for root in &roots {
            info!("Scanning {}", root.display());
            self.walk_root(root, &exclude, &mut report);
        }

        report.roots = roots;
        report.elapsed = start_time.elapsed();
        info!(
            "Visited {} directories, {} markers {}",
            report.stats.directories_visited,
            report.marker_count(),
            if report.dry_run { "planned" } else { "created" }
        );
        Ok(report)
    }

    /// Walk one validated, canonical root
    fn walk_root(&self, root: &Path, exclude: &[PathBuf], report: &mut RunReport) {
        let mut chain = ScopeChain::new();
        let mut entries = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.file_type().is_dir());

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    let message = err
                        .io_error()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| err.to_string());
                    self.record(report, Warning::Traversal { path, message });
                    continue;
                },
            };

            let depth = entry.depth();
            let path = entry.path();

            if self.is_pruned(path, depth, exclude) {
                debug!("Skipping excluded path: {}", path.display());
                report.stats.pruned += 1;
                entries.skip_current_dir();
                continue;
            }

            report.stats.directories_visited += 1;

            if let Some(kind) = self.writer.existing_marker(path) {
                debug!("Skipping {} with existing {}", path.display(), kind);
                report.stats.already_marked += 1;
                entries.skip_current_dir();
                continue;
            }

            // The root itself is never a candidate
            if depth > 0 {
                let result = chain.visit(depth, path, true);
                let node = DirectoryNode {
                    path: path.to_path_buf(),
                    basename: entry.file_name().to_os_string(),
                    ignored: result.is_ignored(),
                    marker_kind: self.classifier.classify(entry.file_name()),
                };

                if let Some(kind) = node.marker_to_write() {
                    if self.mark(&node, kind, report) {
                        entries.skip_current_dir();
                        continue;
                    }
                }
            }

            let load = RuleScope::load(path, &self.options.sources);
            for warning in load.warnings {
                self.record(report, warning);
            }
            if let Some(scope) = load.scope {
                chain.push(depth, scope);
            }
        }
    }

    /// Write (or plan) the marker; true when the directory now counts as marked
    fn mark(&self, node: &DirectoryNode, kind: MarkerKind, report: &mut RunReport) -> bool {
        let marked = MarkedDirectory {
            path: node.path.clone(),
            marker: self.writer.marker_path(&node.path, kind),
            kind,
        };

        if self.options.dry_run {
            info!("Would create {}", marked.marker.display());
            self.report_event(&WalkEvent::Planned(&marked));
            report.stats.markers_planned += 1;
            report.marked.push(marked);
            return true;
        }

        match self.writer.write(&node.path, kind) {
            Ok(WriteOutcome::Created(path)) => {
                info!("Created {}", path.display());
                self.report_event(&WalkEvent::Marked(&marked));
                report.stats.markers_created += 1;
                report.marked.push(marked);
                true
            },
            Ok(WriteOutcome::AlreadyPresent(path)) => {
                debug!("Marker appeared meanwhile: {}", path.display());
                report.stats.already_marked += 1;
                true
            },
            Err(e) => {
                self.record(
                    report,
                    Warning::Write {
                        path: node.path.clone(),
                        kind,
                        message: e.to_string(),
                    },
                );
                false
            },
        }
    }

    fn is_pruned(&self, path: &Path, depth: usize, exclude: &[PathBuf]) -> bool {
        if depth > 0
            && self.options.skip_git_dir
            && path.file_name().is_some_and(|name| name == ".git")
        {
            return true;
        }
        exclude.iter().any(|excluded| path.starts_with(excluded))
    }

    fn canonical_excludes(&self) -> Vec<PathBuf> {
        self.options
            .exclude
            .iter()
            .map(|path| path.canonicalize().unwrap_or_else(|_| path.clone()))
            .collect()
    }

    fn record(&self, report: &mut RunReport, warning: Warning) {
        debug!("{}", warning);
        self.report_event(&WalkEvent::Warning(&warning));
        report.warnings.push(warning);
    }

    fn report_event(&self, event: &WalkEvent<'_>) {
        if let Some(callback) = &self.progress_callback {
            callback(event);
        }
    }
}

/// Resolve `root` to a canonical directory path
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DirmarkerError::root_not_found(root.to_path_buf()));
        },
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_dir() {
        return Err(DirmarkerError::root_not_directory(root.to_path_buf()));
    }
    Ok(root.canonicalize()?)
}
