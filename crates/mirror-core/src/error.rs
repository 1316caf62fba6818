//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source directory (root or a subdirectory) was not there when visited
    #[error("Source directory does not exist: {path}")]
    MissingSource { path: PathBuf },

    /// Source and destination are the same tree or nested inside each other
    #[error("Destination {destination_root} overlaps source {source_root}")]
    OverlappingRoots {
        source_root: PathBuf,
        destination_root: PathBuf,
    },

    /// Recursion went deeper than the configured guard
    #[error("Directory depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded { path: PathBuf, limit: usize },

    /// Invalid mirror configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // Transparent wrappers for underlying errors
    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
