//! Synchronizer implementation
//!
//! Mirrors a source tree into a destination tree. Each directory is handled
//! in three ordered phases: copy new or changed files, recurse into
//! subdirectories, then delete whatever the source no longer has. Nothing is
//! remembered between passes; every decision is made against the live
//! filesystem.

use std::path::Path;

use chrono::Local;
use mirror_fs::{DirectoryListing, EntryKind, entry_kind, files_identical, io};

use crate::event::{EventSink, SyncEvent, TracingSink};
use crate::{Error, Result};

use super::options::{FailurePolicy, SyncOptions};
use super::report::PassReport;

/// Engine for mirroring one directory tree into another
///
/// The sink is injected so callers decide where events go: the
/// [`TracingSink`] for the process log, a
/// [`RecordingSink`](crate::RecordingSink) in tests.
pub struct Synchronizer<S = TracingSink> {
    options: SyncOptions,
    sink: S,
}

impl Synchronizer<TracingSink> {
    /// Create a Synchronizer that forwards events to `tracing`
    pub fn new(options: SyncOptions) -> Self {
        Self::with_sink(options, TracingSink)
    }
}

impl<S: EventSink> Synchronizer<S> {
    pub fn with_sink(options: SyncOptions, sink: S) -> Self {
        Self { options, sink }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one sync pass from `source` into `destination`.
    ///
    /// Never fails: every error is reported through the sink and the
    /// returned report, and the caller can simply try again later.
    pub fn sync(&self, source: &Path, destination: &Path) -> PassReport {
        self.run_pass(source, destination).0
    }

    /// Run one sync pass, surfacing the error that aborted it.
    ///
    /// Events are emitted exactly as with [`sync`](Self::sync). Failures
    /// contained by [`FailurePolicy::SkipSubtree`] do not abort the pass and
    /// only show up in the returned report.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the pass early.
    pub fn try_sync(&self, source: &Path, destination: &Path) -> Result<PassReport> {
        match self.run_pass(source, destination) {
            (_, Some(error)) => Err(error),
            (report, None) => Ok(report),
        }
    }

    fn run_pass(&self, source: &Path, destination: &Path) -> (PassReport, Option<Error>) {
        let mut pass = Pass {
            options: &self.options,
            sink: &self.sink,
            report: PassReport::begin(self.options.dry_run),
        };

        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            dry_run = self.options.dry_run,
            "Starting sync pass"
        );

        let outcome = check_roots(source, destination)
            .and_then(|()| pass.sync_directory(source, destination, 0, true));

        let aborted = match outcome {
            Ok(()) => {
                pass.emit(SyncEvent::PassCompleted {
                    timestamp: Local::now(),
                });
                None
            }
            Err(error) => {
                pass.fail(&error);
                Some(error)
            }
        };

        pass.report.finish();
        (pass.report, aborted)
    }
}

/// Root-level preconditions, checked once per pass.
fn check_roots(source: &Path, destination: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(Error::MissingSource {
            path: source.to_path_buf(),
        });
    }

    let source_root = mirror_fs::resolve_root(source)?;
    let destination_root = mirror_fs::resolve_root(destination)?;
    if mirror_fs::roots_overlap(&source_root, &destination_root) {
        return Err(Error::OverlappingRoots {
            source_root,
            destination_root,
        });
    }

    Ok(())
}

/// State of a single pass
struct Pass<'a, S: ?Sized> {
    options: &'a SyncOptions,
    sink: &'a S,
    report: PassReport,
}

impl<S: EventSink + ?Sized> Pass<'_, S> {
    fn emit(&mut self, event: SyncEvent) {
        self.report.tally(&event);
        self.sink.record(&event);
    }

    fn fail(&mut self, error: &Error) {
        self.report.errors.push(error.to_string());
        self.emit(SyncEvent::Error {
            message: format!("An error occurred during synchronization: {}", error),
        });
    }

    /// Reconcile one directory level, then everything beneath it.
    ///
    /// `parent_present` is false only in a dry run, below a directory that
    /// would have been created.
    fn sync_directory(
        &mut self,
        source: &Path,
        destination: &Path,
        depth: usize,
        parent_present: bool,
    ) -> Result<()> {
        let source_listing =
            DirectoryListing::read_if_exists(source)?.ok_or_else(|| Error::MissingSource {
                path: source.to_path_buf(),
            })?;

        if let Some(limit) = self.options.max_depth
            && depth > limit
        {
            return Err(Error::DepthLimitExceeded {
                path: source.to_path_buf(),
                limit,
            });
        }

        let destination_present =
            self.ensure_destination(destination, depth == 0, parent_present)?;

        for name in source_listing.files() {
            self.reconcile_file(&source.join(name), &destination.join(name), destination_present)?;
        }

        for name in source_listing.directories() {
            let result = self.sync_directory(
                &source.join(name),
                &destination.join(name),
                depth + 1,
                destination_present,
            );
            self.contain(result)?;
        }

        if destination_present {
            self.remove_orphans(&source_listing, destination)?;
        }

        Ok(())
    }

    /// Apply the failure policy to a finished subdirectory.
    fn contain(&mut self, result: Result<()>) -> Result<()> {
        match (result, self.options.failure_policy) {
            (Err(error), FailurePolicy::SkipSubtree) => {
                self.fail(&error);
                Ok(())
            }
            (result, _) => result,
        }
    }

    /// Make sure `destination` is a directory.
    ///
    /// Returns whether it exists on disk afterwards, which in a dry run is
    /// only the case if it already did.
    ///
    /// Only the root may be a symlink to a directory; below it a link is
    /// replaced, so a pass never writes or deletes through one.
    fn ensure_destination(
        &mut self,
        destination: &Path,
        is_root: bool,
        parent_present: bool,
    ) -> Result<bool> {
        let existing = if parent_present {
            entry_kind(destination)?
        } else {
            None
        };

        match existing {
            Some(EntryKind::Directory) => return Ok(true),
            Some(EntryKind::Other) if is_root && destination.is_dir() => return Ok(true),
            // Something else holds the name; the source's directory wins
            Some(_) => self.delete_file(destination)?,
            None => {}
        }

        if !self.options.dry_run {
            io::create_dir_all(destination)?;
        }
        self.emit(SyncEvent::DirectoryCreated {
            path: destination.to_path_buf(),
        });
        Ok(!self.options.dry_run)
    }

    /// Copy `source_file` over `destination_file` unless the content already matches.
    fn reconcile_file(
        &mut self,
        source_file: &Path,
        destination_file: &Path,
        destination_present: bool,
    ) -> Result<()> {
        if destination_present {
            match entry_kind(destination_file)? {
                Some(EntryKind::Directory) => self.delete_directory(destination_file)?,
                Some(EntryKind::File) => {
                    if files_identical(source_file, destination_file)? {
                        tracing::debug!(path = %destination_file.display(), "Unchanged");
                        return Ok(());
                    }
                }
                Some(_) => self.delete_file(destination_file)?,
                None => {}
            }
        }

        if !self.options.dry_run {
            io::copy_atomic(source_file, destination_file, self.options.robustness)?;
        }
        self.emit(SyncEvent::FileCopied {
            from: source_file.to_path_buf(),
            to: destination_file.to_path_buf(),
        });
        Ok(())
    }

    /// Delete destination entries that have no counterpart in the source.
    ///
    /// Names the source holds under the other entry type were already
    /// replaced by the copy and recursion phases.
    fn remove_orphans(&mut self, source_listing: &DirectoryListing, destination: &Path) -> Result<()> {
        let Some(destination_listing) = DirectoryListing::read_if_exists(destination)? else {
            return Ok(());
        };

        for name in destination_listing.files() {
            if !source_listing.has_file(name) && !source_listing.has_directory(name) {
                self.delete_file(&destination.join(name))?;
            }
        }

        for name in destination_listing.directories() {
            if !source_listing.has_directory(name) && !source_listing.has_file(name) {
                self.delete_directory(&destination.join(name))?;
            }
        }

        Ok(())
    }

    fn delete_file(&mut self, path: &Path) -> Result<()> {
        if !self.options.dry_run {
            io::remove_file(path)?;
        }
        self.emit(SyncEvent::FileDeleted {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn delete_directory(&mut self, path: &Path) -> Result<()> {
        if !self.options.dry_run {
            io::remove_dir_all(path)?;
        }
        self.emit(SyncEvent::DirectoryDeleted {
            path: path.to_path_buf(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, RecordingSink};
    use std::fs;
    use tempfile::TempDir;

    fn recording(options: SyncOptions) -> Synchronizer<RecordingSink> {
        Synchronizer::with_sink(options, RecordingSink::new())
    }

    #[test]
    fn copies_into_fresh_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let destination = temp.path().join("replica");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), "hello").unwrap();

        let sync = recording(SyncOptions::default());
        let report = sync.sync(&source, &destination);

        assert!(report.success);
        assert_eq!(fs::read_to_string(destination.join("a.txt")).unwrap(), "hello");
        assert_eq!(sync.sink().count(EventKind::DirectoryCreated), 1);
        assert_eq!(sync.sink().count(EventKind::FileCopied), 1);
        assert_eq!(sync.sink().count(EventKind::PassCompleted), 1);
    }

    #[test]
    fn missing_source_is_reported_not_raised() {
        let temp = TempDir::new().unwrap();
        let sync = recording(SyncOptions::default());

        let report = sync.sync(&temp.path().join("nope"), &temp.path().join("replica"));

        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("does not exist"));
        assert_eq!(sync.sink().count(EventKind::Error), 1);
        assert_eq!(sync.sink().count(EventKind::PassCompleted), 0);
        assert!(!temp.path().join("replica").exists());
    }

    #[test]
    fn try_sync_surfaces_missing_source() {
        let temp = TempDir::new().unwrap();
        let sync = recording(SyncOptions::default());

        let err = sync
            .try_sync(&temp.path().join("nope"), &temp.path().join("replica"))
            .unwrap_err();

        assert!(matches!(err, Error::MissingSource { .. }));
        // The sink still hears about it
        assert_eq!(sync.sink().count(EventKind::Error), 1);
    }

    #[test]
    fn destination_inside_source_is_rejected() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), "x").unwrap();

        let sync = recording(SyncOptions::default());
        let err = sync.try_sync(&source, &source.join("replica")).unwrap_err();

        assert!(matches!(err, Error::OverlappingRoots { .. }));
        assert!(!source.join("replica").exists());
    }

    #[test]
    fn same_root_is_rejected() {
        let temp = TempDir::new().unwrap();
        let sync = recording(SyncOptions::default());

        let report = sync.sync(temp.path(), temp.path());

        assert!(!report.success);
        assert_eq!(sync.sink().count(EventKind::FileDeleted), 0);
    }

    #[test]
    fn error_event_carries_fixed_description() {
        let temp = TempDir::new().unwrap();
        let sync = recording(SyncOptions::default());
        sync.sync(&temp.path().join("nope"), &temp.path().join("replica"));

        let events = sync.sink().events();
        let SyncEvent::Error { message } = &events[0] else {
            panic!("expected an error event, got {:?}", events);
        };
        assert!(message.starts_with("An error occurred during synchronization"));
        assert!(message.contains("nope"));
    }
}
