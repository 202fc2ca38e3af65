//! Check command implementation

use crate::cli::commands::load_settings;
use crate::ignore::checker::{IgnoreChecker, IgnoreResult};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute the check command
pub fn execute(config: Option<&Path>, path: PathBuf, root: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config)?;
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let root = root.unwrap_or_else(|| cwd.clone());

    let checker = IgnoreChecker::new(&root, settings.ignore_sources())?;
    let target = resolve_target(&cwd, &path);
    let report = checker
        .check(&target)
        .with_context(|| format!("Failed to check {}", path.display()))?;

    println!("{}: {}", "Path".bold(), report.path.display().to_string().cyan());
    match &report.result {
        IgnoreResult::NotIgnored => {
            println!("{}: {}", "Status".bold(), "not ignored".green());
        },
        IgnoreResult::Whitelisted(rule) => {
            println!("{}: {}", "Status".bold(), "not ignored".green());
            println!("{}: {}", "Rule".bold(), rule);
        },
        IgnoreResult::Ignored(rule) => {
            println!("{}: {}", "Status".bold(), "ignored".yellow());
            println!("{}: {}", "Rule".bold(), rule);
        },
        IgnoreResult::Inherited { ancestor } => {
            println!("{}: {}", "Status".bold(), "ignored".yellow());
            println!("{}: inside {}", "Reason".bold(), ancestor.display());
        },
    }

    if report.is_dir {
        let writer = settings.writer();
        let existing = writer.existing_marker(&report.path);
        let kind = report
            .path
            .file_name()
            .and_then(|name| settings.classifier().classify(name));

        match (existing, kind) {
            (Some(existing), _) => {
                println!("{}: already has {}", "Marker".bold(), existing);
            },
            (None, Some(kind)) if report.result.is_ignored() => {
                println!(
                    "{}: {} ({})",
                    "Marker".bold(),
                    kind,
                    writer.file_name(kind)
                );
            },
            (None, Some(kind)) => {
                println!("{}: none (name fits {}, but not ignored)", "Marker".bold(), kind);
            },
            (None, None) => println!("{}: none", "Marker".bold()),
        }
    }

    for warning in &report.warnings {
        eprintln!("{} {}", "⚠".yellow(), warning);
    }

    Ok(())
}

/// Absolute, symlink-resolved form of `path` as far as it exists
fn resolve_target(cwd: &Path, path: &Path) -> PathBuf {
    let absolute = cwd.join(path);
    if let Ok(canonical) = absolute.canonicalize() {
        return canonical;
    }
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => absolute,
        },
        _ => absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_target() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cwd = temp_dir.path().canonicalize()?;
        std::fs::create_dir(cwd.join("sub"))?;

        assert_eq!(resolve_target(&cwd, Path::new("sub")), cwd.join("sub"));
        assert_eq!(
            resolve_target(&cwd, Path::new("sub/missing")),
            cwd.join("sub").join("missing")
        );

        Ok(())
    }
}
