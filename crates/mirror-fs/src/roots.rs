//! Resolution of the two root paths a mirror operates on

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolve a root to an absolute path.
///
/// Existing paths are canonicalized (without the `\\?\` prefix on Windows).
/// Paths that do not exist yet are made absolute against the current
/// directory and cleaned lexically, so a destination that will be created
/// later can still be compared against the source.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return dunce::canonicalize(path).map_err(|e| Error::io(path, e));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| Error::io(path, e))?;
        cwd.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    Ok(cleaned)
}

/// Whether two resolved roots are equal or one contains the other.
pub fn roots_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
