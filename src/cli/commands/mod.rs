//! CLI command implementations

pub mod check;
pub mod completion;
pub mod config;
pub mod mark;

use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::Path;

/// Load settings from `path`, or from the default location
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(Some(path))
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Settings::load(None).context("Failed to load config"),
    }
}
