//! branchplay - interactive branching-video player

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use branchplay::cli::{Cli, Commands};
use branchplay::logging::{self, LogTarget};
use branchplay::tui::{current_theme, Role};

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let target = match &cli.command {
        Commands::Play(args) => args
            .log_file
            .clone()
            .or_else(logging::default_log_file)
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Stderr),
        _ => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(cli.verbose, &target) {
        let message = format!("Warning: {:#}", e);
        eprintln!("{}", current_theme().paint(Role::Error, &message));
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let message = format!("Error: {:#}", e);
            eprintln!("{}", current_theme().paint(Role::Error, &message));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Play(args) => commands::play::handle(&args)?,
        Commands::Check(args) => {
            if !commands::check::handle(&args)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Simulate(args) => commands::simulate::handle(&args)?,
        Commands::Completions { shell } => commands::completions::handle(shell)?,
    }
    Ok(ExitCode::SUCCESS)
}
