//! Directory tree snapshots.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One entry in a [`snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory,
    File(Vec<u8>),
}

/// Every entry below `root`, keyed by its `/`-separated relative path.
///
/// Returns an empty map if `root` does not exist.
pub fn snapshot(root: &Path) -> BTreeMap<String, Node> {
    let mut nodes = BTreeMap::new();
    if root.is_dir() {
        collect(root, "", &mut nodes);
    }
    nodes
}

fn collect(dir: &Path, prefix: &str, nodes: &mut BTreeMap<String, Node>) {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Could not read directory {}: {}", dir.display(), e));

    for entry in entries {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let path = entry.path();

        if path.is_dir() {
            nodes.insert(relative.clone(), Node::Directory);
            collect(&path, &relative, nodes);
        } else if path.is_file() {
            let content = fs::read(&path)
                .unwrap_or_else(|e| panic!("Could not read file {}: {}", path.display(), e));
            nodes.insert(relative, Node::File(content));
        }
    }
}

/// Assert that `replica` is an exact copy of `source`.
///
/// # Panics
/// Panics listing the first differing entry.
pub fn assert_mirrored(source: &Path, replica: &Path) {
    let expected = snapshot(source);
    let actual = snapshot(replica);

    for (path, node) in &expected {
        match actual.get(path) {
            None => panic!("Missing from replica: {path}"),
            Some(found) if found != node => panic!("Differs in replica: {path}"),
            Some(_) => {}
        }
    }
    for path in actual.keys() {
        assert!(expected.contains_key(path), "Orphan left in replica: {path}");
    }
}
