//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::{FailurePolicy, MirrorConfig};

/// Folder Mirror - Keep a replica directory identical to a source directory
///
/// Runs a sync pass every INTERVAL_MINUTES until interrupted. Arguments
/// override values from the config file.
///
/// Examples:
///   mirror ./source ./replica 5          # Sync every 5 minutes
///   mirror ./source ./replica --once     # Single pass
///   mirror -c mirror.toml --dry-run      # Preview using a config file
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to mirror from
    pub source: Option<PathBuf>,

    /// Directory to mirror into
    pub destination: Option<PathBuf>,

    /// Minutes between passes
    pub interval_minutes: Option<u64>,

    /// Load settings from a TOML, JSON or YAML file
    #[arg(short, long, value_name = "FILE", env = "MIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit
    #[arg(long, conflicts_with = "passes")]
    pub once: bool,

    /// Stop after N passes
    #[arg(long, value_name = "N")]
    pub passes: Option<u64>,

    /// Report changes without modifying the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Keep going with sibling directories when one fails
    #[arg(long)]
    pub skip_failed: bool,

    /// Fail directories nested deeper than N levels
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Log file path
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print each pass report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command line values over `config`.
    pub fn apply(&self, config: &mut MirrorConfig) {
        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        if let Some(destination) = &self.destination {
            config.destination = Some(destination.clone());
        }
        if let Some(interval) = self.interval_minutes {
            config.interval_minutes = interval;
        }
        if self.dry_run {
            config.sync.dry_run = true;
        }
        if self.skip_failed {
            config.sync.failure_policy = FailurePolicy::SkipSubtree;
        }
        if let Some(depth) = self.max_depth {
            config.sync.max_depth = Some(depth);
        }
        if let Some(file) = &self.log_file {
            config.log.file = Some(file.clone());
        }
        if self.verbose {
            config.log.level = "debug".to_string();
        }
    }

    /// Pass limit: one with `--once`, N with `--passes`, otherwise unlimited.
    pub fn pass_limit(&self) -> Option<u64> {
        if self.once { Some(1) } else { self.passes }
    }
}
