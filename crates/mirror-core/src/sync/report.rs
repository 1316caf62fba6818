//! Summary of a single sync pass

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::event::SyncEvent;

/// Report from a sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassReport {
    /// Whether the pass completed without any error
    pub success: bool,
    /// Whether the destination was left untouched on purpose
    pub dry_run: bool,
    pub started: DateTime<Local>,
    pub finished: Option<DateTime<Local>>,
    pub files_copied: usize,
    pub files_deleted: usize,
    pub directories_created: usize,
    pub directories_deleted: usize,
    /// Errors encountered during the pass
    pub errors: Vec<String>,
}

impl PassReport {
    pub(crate) fn begin(dry_run: bool) -> Self {
        Self {
            success: false,
            dry_run,
            started: Local::now(),
            finished: None,
            files_copied: 0,
            files_deleted: 0,
            directories_created: 0,
            directories_deleted: 0,
            errors: Vec::new(),
        }
    }

    pub(crate) fn tally(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::DirectoryCreated { .. } => self.directories_created += 1,
            SyncEvent::FileCopied { .. } => self.files_copied += 1,
            SyncEvent::FileDeleted { .. } => self.files_deleted += 1,
            SyncEvent::DirectoryDeleted { .. } => self.directories_deleted += 1,
            SyncEvent::PassCompleted { .. } | SyncEvent::Error { .. } => {}
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished = Some(Local::now());
        self.success = self.errors.is_empty();
    }

    /// Total number of changes made (or planned, in a dry run).
    pub fn changes(&self) -> usize {
        self.files_copied + self.files_deleted + self.directories_created + self.directories_deleted
    }

    /// An error-free pass that found the destination already in sync.
    pub fn is_noop(&self) -> bool {
        self.success && self.changes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_changes_only() {
        let mut report = PassReport::begin(false);
        report.tally(&SyncEvent::FileCopied {
            from: "a".into(),
            to: "b".into(),
        });
        report.tally(&SyncEvent::DirectoryCreated { path: "d".into() });
        report.tally(&SyncEvent::Error {
            message: "ignored".into(),
        });
        report.finish();

        assert_eq!(report.files_copied, 1);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.changes(), 2);
        assert!(report.success);
        assert!(!report.is_noop());
    }

    #[test]
    fn errors_make_report_unsuccessful() {
        let mut report = PassReport::begin(true);
        report.errors.push("boom".into());
        report.finish();

        assert!(!report.success);
        assert!(!report.is_noop());
        assert!(report.finished.is_some());
    }
}
