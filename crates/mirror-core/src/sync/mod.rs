//! One-way tree synchronization
//!
//! This module provides:
//! - **engine**: the [`Synchronizer`] and its per-directory reconciliation
//! - **options**: dry-run, failure policy and depth guard for a pass
//! - **report**: the [`PassReport`] summarising one pass

mod engine;
mod options;
mod report;

pub use engine::Synchronizer;
pub use options::{FailurePolicy, SyncOptions};
pub use report::PassReport;
