//! Filesystem primitives for folder-mirror
//!
//! Provides content fingerprints, one-level directory listings, atomic
//! file replacement and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod listing;
pub mod roots;

pub use checksum::{Fingerprint, compute_file_fingerprint, files_identical};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use listing::{DirectoryListing, EntryKind, entry_kind};
pub use roots::{resolve_root, roots_overlap};
