//! Config command implementation

use crate::cli::commands::load_settings;
use crate::config::Settings;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Execute the config command
pub fn execute(config: Option<&Path>, show_origin: bool) -> Result<()> {
    if show_origin {
        let config_path = match config {
            Some(path) => path.to_path_buf(),
            None => Settings::default_config_path()?,
        };
        print_origin(&config_path);
        return Ok(());
    }

    let settings = load_settings(config)?;
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn print_origin(config_path: &Path) {
    println!(
        "{}: {}",
        "Configuration file".bold(),
        config_path.display().to_string().cyan()
    );
    if config_path.exists() {
        println!("{}: {}", "Status".bold(), "exists".green());
    } else {
        println!("{}: {}", "Status".bold(), "not created yet (using defaults)".yellow());
    }
}
