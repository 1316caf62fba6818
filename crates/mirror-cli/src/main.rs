//! Folder Mirror CLI
//!
//! Keeps a replica directory identical to a source directory, one sync pass
//! per interval.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use mirror_core::MirrorConfig;

use cli::Cli;
use error::{CliError, Result};
use logging::Console;

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

/// Returns whether every pass succeeded.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MirrorConfig::load(path)?,
        None => MirrorConfig::default(),
    };
    cli.apply(&mut config);

    let pass_limit = cli.pass_limit();
    if pass_limit == Some(0) {
        return Err(CliError::user("--passes must be at least 1"));
    }
    config.validate(pass_limit.is_some())?;

    let console = if cli.json { Console::Stderr } else { Console::Stdout };
    let log_file = config.log.resolve_file()?;
    logging::init(&config.log.level, cli.verbose, &log_file, console)?;
    tracing::debug!(log_file = %log_file.display(), "Logging initialized");

    if !cli.json {
        commands::print_banner(&config, pass_limit)?;
    }

    let summary = commands::run_mirror(&config, pass_limit, cli.json)?;
    tracing::debug!(
        passes = summary.passes,
        failed = summary.failed,
        changes = summary.changes,
        "Mirror finished"
    );

    Ok(summary.all_succeeded())
}
