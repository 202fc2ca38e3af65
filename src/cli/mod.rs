//! Command-line interface for dirmarker

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// dirmarker - mark ignored build and cache directories for backup tools
#[derive(Parser)]
#[command(
    name = "dirmarker",
    version,
    about = "Marks git-ignored build and cache directories so backup tools skip them",
    long_about = "dirmarker walks project trees and drops a backup-ignore marker or a CACHEDIR.TAG into every directory that is excluded by .gitignore rules and looks like build output or a cache."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Path to config file (default: ~/.dirmarker/config.toml)
    #[arg(long, env = "DIRMARKER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk directory trees and write markers
    Mark {
        /// Root directories (default: configured roots, else the current directory)
        paths: Vec<PathBuf>,

        /// Show which markers would be created without writing them
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Never enter this directory (repeatable)
        #[arg(short, long = "exclude", value_name = "PATH")]
        exclude: Vec<PathBuf>,
    },

    /// Explain whether a path is ignored and which marker it would get
    Check {
        /// Path to inspect
        path: PathBuf,

        /// Top of the tree whose ignore files apply (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Show configuration file location
        #[arg(long)]
        show_origin: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// When to color output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Apply the choice to all `colored` output of this process
    pub fn apply(self) {
        match self {
            ColorChoice::Auto => {},
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mark() {
        let cli = Cli::parse_from([
            "dirmarker", "--color", "never", "mark", "-n", "a", "b", "--exclude", "a/skip",
        ]);
        assert_eq!(cli.color, ColorChoice::Never);
        match cli.command {
            Commands::Mark {
                paths,
                dry_run,
                exclude,
            } => {
                assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
                assert!(dry_run);
                assert_eq!(exclude, vec![PathBuf::from("a/skip")]);
            },
            _ => panic!("expected mark command"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["dirmarker", "-v", "-q", "mark"]).is_err());
    }
}
