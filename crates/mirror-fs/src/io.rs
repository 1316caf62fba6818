//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::{self as stdio, Write};
use std::path::Path;
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, Result};

/// Retry and durability settings for atomic writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// Upper bound on retrying lock acquisition and the final rename.
    pub lock_timeout: Duration,
    /// Flush the temp file to disk before it is renamed into place.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock on the temp file while it is being filled.
pub fn write_atomic(path: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    replace_via_temp(path, config, |temp_path, file| {
        file.write_all(content).map_err(|e| Error::io(temp_path, e))
    })
}

/// Copy `from` over `to` atomically, streaming the bytes.
///
/// Readers of `to` see either the old content or the complete new content.
/// Returns the number of bytes copied.
pub fn copy_atomic(from: &Path, to: &Path, config: RobustnessConfig) -> Result<u64> {
    let mut source = File::open(from).map_err(|e| Error::io(from, e))?;
    let mut copied = 0;
    replace_via_temp(to, config, |_, file| {
        copied = stdio::copy(&mut source, file).map_err(|e| Error::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })?;
        Ok(())
    })?;
    Ok(copied)
}

/// Create a directory and any missing parents.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Remove a single file (or symlink).
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Remove a directory and everything beneath it.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

const TEMP_PREFIX: &str = ".mirror-";
const TEMP_SUFFIX: &str = ".tmp";

fn replace_via_temp<F>(path: &Path, config: RobustnessConfig, fill: F) -> Result<()>
where
    F: FnOnce(&Path, &mut File) -> Result<()>,
{
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    create_dir_all(parent)?;

    // Random name created with O_EXCL in the target's directory, so it can
    // neither clash with a real entry nor cross filesystems on rename
    let (mut temp_file, temp_path) = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?
        .into_parts();

    retry_transient(config.lock_timeout, || temp_file.try_lock_exclusive()).map_err(|_| {
        Error::LockFailed {
            path: path.to_path_buf(),
        }
    })?;

    fill(&temp_path, &mut temp_file)?;

    if config.enable_fsync {
        temp_file
            .sync_all()
            .map_err(|e| Error::io(temp_path.to_path_buf(), e))?;
    }

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    drop(temp_file);

    // On any early return `temp_path` is dropped and the temp file removed
    retry_transient(config.lock_timeout, || fs::rename(&temp_path, path))
        .map_err(|e| Error::io(path, e))?;
    let _ = temp_path.keep();
    Ok(())
}

/// Lock contention, and on Windows a rename racing a reader, clear up on their own.
fn is_transient(err: &stdio::Error) -> bool {
    let contended = fs2::lock_contended_error().raw_os_error();
    if contended.is_some() && err.raw_os_error() == contended {
        return true;
    }
    match err.kind() {
        stdio::ErrorKind::Interrupted | stdio::ErrorKind::WouldBlock => true,
        stdio::ErrorKind::PermissionDenied => cfg!(windows),
        _ => false,
    }
}

fn retry_transient<T>(
    timeout: Duration,
    mut op: impl FnMut() -> stdio::Result<T>,
) -> stdio::Result<T> {
    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };

    backoff::retry(policy, || {
        op().map_err(|e| {
            if is_transient(&e) {
                tracing::debug!(error = %e, "Transient I/O failure, retrying");
                backoff::Error::transient(e)
            } else {
                backoff::Error::permanent(e)
            }
        })
    })
    .map_err(|err| match err {
        backoff::Error::Permanent(e) => e,
        backoff::Error::Transient { err, .. } => err,
    })
}
