//! Tracing setup: console plus an appended log file

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Where console log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stdout,
    /// Keeps stdout free for machine-readable output
    Stderr,
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` unless `verbose` is set, which
/// always means `debug`.
pub fn init(level: &str, verbose: bool, log_file: &Path, console: Console) -> Result<()> {
    let filter = build_filter(level, verbose)?;
    let file = open_log_file(log_file)?;

    let console_writer = match console {
        Console::Stdout => BoxMakeWriter::new(std::io::stdout),
        Console::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(console_writer);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(CliError::logging)
}

fn build_filter(level: &str, verbose: bool) -> Result<EnvFilter> {
    if verbose {
        return EnvFilter::try_new("debug").map_err(CliError::logging);
    }

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(CliError::logging)
}

/// Open `path` for appending, creating it and its parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        mirror_fs::io::create_dir_all(parent)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| mirror_fs::Error::io(path, e).into())
}
