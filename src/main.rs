//! dirmarker CLI
//!
//! Command-line interface for marking ignored build and cache directories.

use anyhow::Result;
use clap::Parser;
use dirmarker::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.color.apply();
    let config = cli.config.as_deref();

    // Execute the command
    match cli.command {
        Commands::Mark {
            paths,
            dry_run,
            exclude,
        } => commands::mark::execute(config, paths, dry_run, exclude, cli.quiet),
        Commands::Check { path, root } => commands::check::execute(config, path, root),
        Commands::Config { show_origin } => commands::config::execute(config, show_origin),
        Commands::Completion { shell } => commands::completion::execute(shell, cli.quiet),
    }
}
