//! Mission scenarios: a source tree evolving over several passes, with the
//! replica checked after each one.

use std::fs;

use mirror_core::{
    EventKind, FailurePolicy, RecordingSink, SyncEvent, SyncOptions, Synchronizer,
};
use mirror_test_utils::{MirrorFixture, Node};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn recording(options: SyncOptions) -> Synchronizer<RecordingSink> {
    Synchronizer::with_sink(options, RecordingSink::new())
}

fn pass(sync: &Synchronizer<RecordingSink>, fixture: &MirrorFixture) -> Vec<SyncEvent> {
    let report = sync.sync(fixture.source(), fixture.replica());
    assert!(report.success, "pass failed: {:?}", report.errors);
    fixture.assert_mirrored();
    sync.sink().take()
}

fn count(events: &[SyncEvent], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

#[test]
fn mission_project_lifecycle() {
    let fixture = MirrorFixture::new()
        .with_source_file("README.md", "# Project")
        .with_source_file("src/main.rs", "fn main() {}")
        .with_source_file("src/lib.rs", "pub fn lib() {}");
    let sync = recording(SyncOptions::default());

    // Day 1: initial mirror
    let events = pass(&sync, &fixture);
    assert_eq!(count(&events, EventKind::FileCopied), 3);

    // Day 2: one edit, one new module
    fixture.write_source("src/lib.rs", "pub fn lib() { todo() }");
    fixture.write_source("src/util/mod.rs", "pub mod util;");
    let events = pass(&sync, &fixture);
    assert_eq!(count(&events, EventKind::FileCopied), 2);
    assert_eq!(count(&events, EventKind::DirectoryCreated), 1);

    // Day 3: the util module is dropped
    fs::remove_dir_all(fixture.source().join("src/util")).unwrap();
    let events = pass(&sync, &fixture);
    assert_eq!(
        events[0],
        SyncEvent::DirectoryDeleted {
            path: fixture.replica().join("src").join("util")
        }
    );

    // Day 4: nothing happened
    let events = pass(&sync, &fixture);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::PassCompleted);
}

#[test]
fn mission_file_becomes_directory_and_back() {
    let fixture = MirrorFixture::new().with_source_file("notes", "a flat file");
    let sync = recording(SyncOptions::default());
    pass(&sync, &fixture);

    fs::remove_file(fixture.source().join("notes")).unwrap();
    fixture.write_source("notes/today.md", "split into a folder");
    let events = pass(&sync, &fixture);
    assert_eq!(count(&events, EventKind::FileDeleted), 1);
    assert_eq!(
        fixture.replica_snapshot().get("notes"),
        Some(&Node::Directory)
    );

    fs::remove_dir_all(fixture.source().join("notes")).unwrap();
    fixture.write_source("notes", "flat again");
    let events = pass(&sync, &fixture);
    assert_eq!(count(&events, EventKind::DirectoryDeleted), 1);
    assert_eq!(fixture.read_replica("notes"), "flat again");
}

#[test]
fn mission_source_outage_and_recovery() {
    let fixture = MirrorFixture::new().with_source_file("keep.txt", "v1");
    let sync = recording(SyncOptions::default());
    pass(&sync, &fixture);

    // The source disappears: the pass fails but the replica survives
    let parked = fixture.root().join("parked");
    fs::rename(fixture.source(), &parked).unwrap();
    let report = sync.sync(fixture.source(), fixture.replica());
    assert!(!report.success);
    assert_eq!(fixture.read_replica("keep.txt"), "v1");
    assert_eq!(sync.sink().count(EventKind::Error), 1);
    sync.sink().take();

    // It comes back with changes
    fs::rename(&parked, fixture.source()).unwrap();
    fixture.write_source("keep.txt", "v2");
    pass(&sync, &fixture);
    assert_eq!(fixture.read_replica("keep.txt"), "v2");
}

#[test]
fn mission_preview_then_apply() {
    let fixture = MirrorFixture::new()
        .with_source_file("publish/index.html", "<h1>new</h1>")
        .with_replica_file("publish/index.html", "<h1>old</h1>")
        .with_replica_file("publish/draft.html", "wip");

    let preview = recording(SyncOptions::dry_run());
    let report = preview.sync(fixture.source(), fixture.replica());
    assert!(report.dry_run);
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_deleted, 1);
    assert_eq!(fixture.read_replica("publish/draft.html"), "wip");

    let apply = recording(SyncOptions::default());
    let applied = apply.sync(fixture.source(), fixture.replica());
    assert_eq!(applied.changes(), report.changes());
    assert!(predicate::path::missing().eval(&fixture.replica().join("publish/draft.html")));
    fixture.assert_mirrored();
}

#[test]
fn mission_deep_tree_with_depth_guard() {
    let deep = "l1/l2/l3/l4/l5/file.txt";
    let fixture = MirrorFixture::new()
        .with_source_file(deep, "deep")
        .with_source_file("shallow/file.txt", "shallow");

    let guarded = recording(
        SyncOptions::default()
            .with_max_depth(3)
            .with_failure_policy(FailurePolicy::SkipSubtree),
    );
    let report = guarded.sync(fixture.source(), fixture.replica());
    assert!(!report.success);
    assert_eq!(fixture.read_replica("shallow/file.txt"), "shallow");
    fixture.assert_replica_missing(deep);

    // Lifting the guard completes the mirror
    pass(&recording(SyncOptions::default()), &fixture);
}
