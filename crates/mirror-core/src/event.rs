//! Events emitted during a sync pass and the sinks that receive them
//!
//! The [`Synchronizer`](crate::Synchronizer) never logs directly. Every
//! change it makes (or would make, in a dry run) is described by a
//! [`SyncEvent`] handed to an injected [`EventSink`].

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Discriminant of a [`SyncEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DirectoryCreated,
    FileCopied,
    FileDeleted,
    DirectoryDeleted,
    PassCompleted,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectoryCreated => "directory_created",
            Self::FileCopied => "file_copied",
            Self::FileDeleted => "file_deleted",
            Self::DirectoryDeleted => "directory_deleted",
            Self::PassCompleted => "pass_completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observable step of a sync pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncEvent {
    DirectoryCreated { path: PathBuf },
    FileCopied { from: PathBuf, to: PathBuf },
    FileDeleted { path: PathBuf },
    DirectoryDeleted { path: PathBuf },
    PassCompleted { timestamp: DateTime<Local> },
    Error { message: String },
}

impl SyncEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DirectoryCreated { .. } => EventKind::DirectoryCreated,
            Self::FileCopied { .. } => EventKind::FileCopied,
            Self::FileDeleted { .. } => EventKind::FileDeleted,
            Self::DirectoryDeleted { .. } => EventKind::DirectoryDeleted,
            Self::PassCompleted { .. } => EventKind::PassCompleted,
            Self::Error { .. } => EventKind::Error,
        }
    }

    /// Whether this event describes a change to the destination tree.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::PassCompleted { .. } | Self::Error { .. })
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreated { path } => {
                write!(f, "Created destination directory: {}", path.display())
            }
            Self::FileCopied { from, to } => {
                write!(f, "Copied file: {} to {}", from.display(), to.display())
            }
            Self::FileDeleted { path } => write!(f, "Deleted file: {}", path.display()),
            Self::DirectoryDeleted { path } => write!(f, "Deleted directory: {}", path.display()),
            Self::PassCompleted { timestamp } => write!(
                f,
                "Synchronization completed at {}",
                timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            Self::Error { message } => f.write_str(message),
        }
    }
}

/// Receiver of sync events.
pub trait EventSink {
    fn record(&self, event: &SyncEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn record(&self, event: &SyncEvent) {
        (**self).record(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn record(&self, event: &SyncEvent) {
        (**self).record(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn record(&self, event: &SyncEvent) {
        (**self).record(event)
    }
}

/// Forwards events to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Error { message } => {
                tracing::error!(kind = %event.kind(), "{}", message);
            }
            _ => {
                tracing::info!(kind = %event.kind(), "{}", event);
            }
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded events, leaving the sink empty.
    pub fn take(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of recorded events of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &SyncEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &SyncEvent) {}
}
