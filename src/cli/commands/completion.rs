use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io::{self, Write};

const BIN_NAME: &str = "dirmarker";

/// Generate shell completion scripts
///
/// The script goes to stdout so it can be piped or `eval`ed; installation
/// hints go to stderr.
pub fn execute(shell: Shell, quiet: bool) -> Result<()> {
    let mut cmd = Cli::command();
    let mut stdout = io::stdout();
    generate(shell, &mut cmd, BIN_NAME, &mut stdout);
    stdout.flush()?;

    if !quiet {
        print_instructions(shell);
    }
    Ok(())
}

fn print_instructions(shell: Shell) {
    eprintln!("\n{}", "Installation Instructions:".bold());

    match shell {
        Shell::Bash => {
            eprintln!("  Add the following to your ~/.bashrc or ~/.bash_profile:");
            eprintln!("  {}", "eval \"$(dirmarker completion bash 2>/dev/null)\"".cyan());
        },
        Shell::Zsh => {
            eprintln!("  Save the script to a file in your fpath:");
            eprintln!(
                "  {}",
                "dirmarker completion zsh > ~/.local/share/zsh/site-functions/_dirmarker".cyan()
            );
        },
        Shell::Fish => {
            eprintln!("  Save the completion script:");
            eprintln!(
                "  {}",
                "dirmarker completion fish > ~/.config/fish/completions/dirmarker.fish".cyan()
            );
        },
        Shell::PowerShell => {
            eprintln!("  Add the following to your PowerShell profile:");
            eprintln!(
                "  {}",
                "Invoke-Expression (& dirmarker completion powershell)".cyan()
            );
        },
        _ => {
            eprintln!(
                "  Please refer to your shell's documentation for installing completion scripts."
            );
        },
    }
}
