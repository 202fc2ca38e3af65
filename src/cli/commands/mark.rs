//! Mark command implementation

use crate::cli::commands::load_settings;
use crate::config::Settings;
use crate::core::types::MarkerKind;
use crate::walker::{RunReport, TreeWalker, WalkEvent};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute the mark command
pub fn execute(
    config: Option<&Path>,
    paths: Vec<PathBuf>,
    dry_run: bool,
    exclude: Vec<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let settings = load_settings(config)?;
    let roots = resolve_roots(paths, &settings)?;

    let walker = TreeWalker::new(
        settings.walk_options(dry_run, &exclude),
        settings.classifier(),
        settings.writer(),
    )
    .with_progress(move |event| match event {
        WalkEvent::Marked(marked) if !quiet => {
            println!("  {} {}", "+".green(), marked.marker.display());
        },
        // A dry run's only output is this list, so quiet does not hide it
        WalkEvent::Planned(marked) => {
            println!("  {} {}", "~".yellow(), marked.marker.display());
        },
        _ => {},
    });

    let report = walker.run(&roots).context("Scan aborted")?;
    print_summary(&report, quiet);

    Ok(())
}

/// Roots from the command line, else from config, else the current directory
fn resolve_roots(paths: Vec<PathBuf>, settings: &Settings) -> Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return Ok(paths);
    }
    if !settings.scan.roots.is_empty() {
        return Ok(settings.scan.roots.clone());
    }
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(vec![cwd])
}

fn print_summary(report: &RunReport, quiet: bool) {
    if !quiet {
        let ignore_markers = report.count_of(MarkerKind::IgnoreMarker);
        let cache_tags = report.count_of(MarkerKind::CacheTag);
        let verb = if report.dry_run {
            "would be created"
        } else {
            "created"
        };

        println!(
            "{} {} markers {} ({} ignore markers, {} cache tags) in {} directories",
            "✓".green(),
            report.marker_count(),
            verb,
            ignore_markers,
            cache_tags,
            report.stats.directories_visited
        );
        if report.stats.already_marked > 0 {
            println!(
                "  {} directories were already marked",
                report.stats.already_marked
            );
        }
    }

    if report.has_warnings() {
        eprintln!(
            "{} {} warnings:",
            "⚠".yellow(),
            report.warnings.len()
        );
        for warning in &report.warnings {
            eprintln!("  • {}", warning);
        }
    }
}
