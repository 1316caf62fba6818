//! Cross-crate scenarios: config loading, the synchronizer and the
//! filesystem layer working together.

use std::fs;
use std::sync::Arc;

use mirror_core::{
    EventKind, EventSink, MirrorConfig, RecordingSink, Scheduler, SyncEvent, Synchronizer,
};
use mirror_fs::{ConfigStore, DirectoryListing, compute_file_fingerprint};
use mirror_test_utils::{MirrorFixture, snapshot};
use pretty_assertions::assert_eq;

#[test]
fn test_config_driven_pass() {
    let fixture = MirrorFixture::new()
        .with_source_file("docs/readme.md", "# readme")
        .with_source_file("data.csv", "1,2,3");
    let config_path = fixture.root().join("mirror.yaml");
    let config = MirrorConfig {
        source: Some(fixture.source().to_path_buf()),
        destination: Some(fixture.replica().to_path_buf()),
        ..MirrorConfig::default()
    };
    ConfigStore::new().save(&config_path, &config).unwrap();

    let loaded = MirrorConfig::load(&config_path).unwrap();
    loaded.validate(true).unwrap();
    let (source, destination) = loaded.roots().unwrap();
    let report = Synchronizer::new(loaded.sync.clone()).sync(source, destination);

    assert!(report.success);
    fixture.assert_mirrored();
}

#[test]
fn test_replica_fingerprints_match_source() {
    let fixture = MirrorFixture::new()
        .with_source_file("a.bin", "alpha")
        .with_source_file("x/y/z.bin", "zeta")
        .with_replica_file("a.bin", "stale alpha");

    Synchronizer::with_sink(Default::default(), RecordingSink::new())
        .sync(fixture.source(), fixture.replica());

    for relative in ["a.bin", "x/y/z.bin"] {
        assert_eq!(
            compute_file_fingerprint(&fixture.source().join(relative)).unwrap(),
            compute_file_fingerprint(&fixture.replica().join(relative)).unwrap(),
            "fingerprint mismatch for {relative}"
        );
    }
}

#[test]
fn test_listings_agree_after_pass() {
    let fixture = MirrorFixture::new()
        .with_source_file("one.txt", "1")
        .with_source_dir("empty")
        .with_replica_dir("orphan");

    Synchronizer::with_sink(Default::default(), RecordingSink::new())
        .sync(fixture.source(), fixture.replica());

    assert_eq!(
        DirectoryListing::read(fixture.source()).unwrap(),
        DirectoryListing::read(fixture.replica()).unwrap()
    );
}

#[test]
fn test_shared_sink_sees_every_pass() {
    let fixture = MirrorFixture::new().with_source_file("a.txt", "a");
    let sink = Arc::new(RecordingSink::new());
    let synchronizer = Synchronizer::with_sink(Default::default(), Arc::clone(&sink));

    let summary = Scheduler::new(std::time::Duration::ZERO)
        .with_max_passes(2)
        .run(|_| synchronizer.sync(fixture.source(), fixture.replica()));

    assert_eq!(summary.passes, 2);
    assert_eq!(sink.count(EventKind::PassCompleted), 2);
    assert_eq!(sink.count(EventKind::FileCopied), 1);
}

/// Keeps only the rendered messages, the way a log file would.
#[derive(Default)]
struct MessageSink {
    lines: std::sync::Mutex<Vec<String>>,
}

impl EventSink for MessageSink {
    fn record(&self, event: &SyncEvent) {
        self.lines.lock().unwrap().push(event.to_string());
    }
}

#[test]
fn test_custom_sink_receives_messages() {
    let fixture = MirrorFixture::new()
        .with_source_file("new.txt", "n")
        .with_replica_file("gone.txt", "g");
    let synchronizer = Synchronizer::with_sink(Default::default(), MessageSink::default());

    synchronizer.sync(fixture.source(), fixture.replica());

    let lines = synchronizer.sink().lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Copied file: "));
    assert!(lines[1].starts_with("Deleted file: "));
    assert!(lines[2].starts_with("Synchronization completed at "));
}

#[test]
fn test_pass_report_serializes() {
    let fixture = MirrorFixture::new().with_source_file("a.txt", "a");
    let report = Synchronizer::with_sink(Default::default(), RecordingSink::new())
        .sync(fixture.source(), fixture.replica());

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["files_copied"], 1);
    assert_eq!(json["directories_created"], 1);
    assert!(json["finished"].is_string());
}

#[test]
fn test_large_file_is_copied_intact() {
    let fixture = MirrorFixture::new();
    let content: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    fs::write(fixture.source().join("big.bin"), &content).unwrap();

    Synchronizer::with_sink(Default::default(), RecordingSink::new())
        .sync(fixture.source(), fixture.replica());

    assert_eq!(fs::read(fixture.replica().join("big.bin")).unwrap(), content);
    assert_eq!(snapshot(fixture.replica()).len(), 1);
}
