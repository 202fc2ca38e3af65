//! Settings file loading and validation

use crate::core::error::{DirmarkerError, Result};
use crate::ignore::parser::IgnoreSources;
use crate::marker::classifier::{Classifier, DEFAULT_CACHE_SUBSTRING, DEFAULT_IGNORE_MARKER_NAMES};
use crate::marker::writer::{MarkerWriter, DEFAULT_IGNORE_MARKER_FILE};
use crate::walker::WalkOptions;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Complete dirmarker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub markers: MarkerSettings,
    pub scan: ScanSettings,
}

/// Which directories get which marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerSettings {
    /// File name the backup tool treats as "skip this directory"
    pub ignore_marker_file: String,
    /// Exact directory names that get the ignore marker
    pub ignore_marker_names: Vec<String>,
    /// Case-insensitive substring that makes a directory a cache directory
    pub cache_substring: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            ignore_marker_file: DEFAULT_IGNORE_MARKER_FILE.to_string(),
            ignore_marker_names: DEFAULT_IGNORE_MARKER_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            cache_substring: DEFAULT_CACHE_SUBSTRING.to_string(),
        }
    }
}

/// Traversal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSettings {
    /// Ignore file names read in every directory
    pub ignore_files: Vec<String>,
    /// Read `.git/info/exclude` where present
    pub git_info_exclude: bool,
    /// Never enter `.git` directories
    pub skip_git_dir: bool,
    /// Roots used when none are given on the command line
    pub roots: Vec<PathBuf>,
    /// Subtrees that are never entered
    pub exclude: Vec<PathBuf>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let sources = IgnoreSources::default();
        Self {
            ignore_files: sources.file_names,
            git_info_exclude: sources.git_info_exclude,
            skip_git_dir: true,
            roots: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path()?,
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            },
            Err(e) => return Err(e.into()),
        };

        debug!("Loading config from {}", path.display());
        Self::from_toml(&content)
    }

    /// Parse and validate TOML settings
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(content).map_err(|e| {
            DirmarkerError::configuration(format!("Failed to parse config: {}", e))
        })?;
        settings.scan.roots = settings.scan.roots.iter().map(|p| expand_home(p)).collect();
        settings.scan.exclude = settings.scan.exclude.iter().map(|p| expand_home(p)).collect();
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            DirmarkerError::configuration(format!("Failed to serialize config: {}", e))
        })
    }

    /// Get the path to the configuration file
    pub fn default_config_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(DirmarkerError::HomeDirectoryNotFound)?;
        Ok(user_dirs.home_dir().join(".dirmarker").join("config.toml"))
    }

    /// Reject values that would make the walker misbehave
    pub fn validate(&self) -> Result<()> {
        if !is_plain_file_name(&self.markers.ignore_marker_file) {
            return Err(DirmarkerError::configuration(
                "markers.ignore_marker_file must be a plain file name",
            ));
        }
        if self.markers.cache_substring.is_empty() {
            return Err(DirmarkerError::configuration(
                "markers.cache_substring must not be empty",
            ));
        }
        if let Some(name) = self.scan.ignore_files.iter().find(|n| !is_plain_file_name(n)) {
            return Err(DirmarkerError::configuration(format!(
                "scan.ignore_files entry {:?} must be a plain file name",
                name
            )));
        }
        Ok(())
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(
            self.markers.ignore_marker_names.iter().cloned(),
            &self.markers.cache_substring,
        )
    }

    pub fn writer(&self) -> MarkerWriter {
        MarkerWriter::new(self.markers.ignore_marker_file.clone())
    }

    pub fn ignore_sources(&self) -> IgnoreSources {
        IgnoreSources {
            file_names: self.scan.ignore_files.clone(),
            git_info_exclude: self.scan.git_info_exclude,
        }
    }

    /// Walker options, with `extra_exclude` added to the configured exclusions
    pub fn walk_options(&self, dry_run: bool, extra_exclude: &[PathBuf]) -> WalkOptions {
        let mut exclude = self.scan.exclude.clone();
        exclude.extend(extra_exclude.iter().cloned());
        WalkOptions {
            sources: self.ignore_sources(),
            exclude,
            skip_git_dir: self.scan.skip_git_dir,
            dry_run,
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\')
}

/// Replace a leading `~` with the home directory
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match UserDirs::new() {
        Some(user_dirs) => user_dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
