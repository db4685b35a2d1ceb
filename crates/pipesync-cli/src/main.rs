//! pipesync CLI
//!
//! Synchronizes content pipeline descriptors with the files next to them.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use commands::SyncArgs;
use error::Result;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let cwd = std::env::current_dir()?;
    commands::run_sync(
        &cwd,
        &SyncArgs {
            descriptors: cli.descriptors,
            project: cli.project,
            fail_fast: cli.fail_fast,
            dry_run: cli.dry_run,
            json: cli.json,
        },
    )
}
