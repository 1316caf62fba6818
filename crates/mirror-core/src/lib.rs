//! Core synchronization layer for folder-mirror
//!
//! This crate provides:
//!
//! - **Synchronizer**: one-way mirroring of a source tree into a destination tree
//! - **Events**: every change is reported to an injected [`EventSink`]
//! - **Configuration**: [`MirrorConfig`] loaded from TOML, JSON or YAML
//! - **Scheduler**: repeated passes on a fixed interval
//!
//! # Architecture
//!
//! ```text
//!                 mirror-cli
//!                     |
//!                mirror-core
//!        +--------+---+-----+----------+
//!        |        |         |          |
//!      sync     event    config    schedule
//!        |                  |
//!        +----- mirror-fs --+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mirror_core::{SyncOptions, Synchronizer};
//!
//! let synchronizer = Synchronizer::new(SyncOptions::default());
//! let report = synchronizer.sync(Path::new("/data/source"), Path::new("/backup/replica"));
//! println!("{} changes", report.changes());
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod schedule;
pub mod sync;

pub use config::{LogSettings, MirrorConfig};
pub use error::{Error, Result};
pub use event::{EventKind, EventSink, NullSink, RecordingSink, SyncEvent, TracingSink};
pub use schedule::{ScheduleSummary, Scheduler};
pub use sync::{FailurePolicy, PassReport, SyncOptions, Synchronizer};
