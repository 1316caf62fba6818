//! Mirror configuration
//!
//! A [`MirrorConfig`] can be loaded from TOML, JSON or YAML. Every field has
//! a default so a config file only needs to name what it changes; command
//! line arguments are layered on top by the caller.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use mirror_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::sync::SyncOptions;
use crate::{Error, Result};

const APP_DIR: &str = "folder-mirror";
const LOG_FILE_NAME: &str = "mirror.log";

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Log file path; `None` means the platform default
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    /// Resolve the log file: configured path, else `<data dir>/folder-mirror/mirror.log`.
    pub fn resolve_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.file
            && !file.as_os_str().is_empty()
        {
            return Ok(file.clone());
        }

        let data_dir = dirs::data_local_dir().ok_or_else(|| {
            Error::invalid_config("Could not determine platform data directory for log file")
        })?;
        Ok(data_dir.join(APP_DIR).join(LOG_FILE_NAME))
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| Error::invalid_config(format!("Invalid log level: {}", self.level)))
    }
}

/// Complete configuration for the mirror process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,

    /// Minutes to wait after a pass finishes before the next one starts
    pub interval_minutes: u64,

    pub sync: SyncOptions,
    pub log: LogSettings,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            interval_minutes: 1,
            sync: SyncOptions::default(),
            log: LogSettings::default(),
        }
    }
}

impl MirrorConfig {
    /// Load a config file; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    /// The two roots, once both are set.
    pub fn roots(&self) -> Result<(&Path, &Path)> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| Error::invalid_config("No source directory given"))?;
        let destination = self
            .destination
            .as_deref()
            .ok_or_else(|| Error::invalid_config("No destination directory given"))?;
        Ok((source, destination))
    }

    /// Check the configuration before the first pass.
    ///
    /// A missing source directory is deliberately not an error here: it is
    /// reported by each pass, so the mirror resumes once it reappears.
    pub fn validate(&self, run_once: bool) -> Result<()> {
        let (source, destination) = self.roots()?;

        if !run_once && self.interval_minutes == 0 {
            return Err(Error::invalid_config("Interval must be at least one minute"));
        }

        let source_root = mirror_fs::resolve_root(source)?;
        let destination_root = mirror_fs::resolve_root(destination)?;
        if mirror_fs::roots_overlap(&source_root, &destination_root) {
            return Err(Error::OverlappingRoots {
                source_root,
                destination_root,
            });
        }

        self.log.level_filter()?;
        Ok(())
    }
}
