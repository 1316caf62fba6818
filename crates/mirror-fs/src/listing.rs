//! One-level directory listings
//!
//! A listing is read fresh from the filesystem every time it is needed and
//! holds only the names of the immediate children, split into regular files
//! and directories. Symlinks are classified by what they point to.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{Error, Result};

/// What occupies a path, without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// A symlink, FIFO, socket or device node
    Other,
}

/// Inspect what occupies `path`, or `None` if nothing does.
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
        Ok(_) => Ok(Some(EntryKind::Other)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Names of the files and subdirectories directly inside a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    files: BTreeSet<OsString>,
    directories: BTreeSet<OsString>,
}

impl DirectoryListing {
    /// List a directory that is expected to exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let mut listing = Self::default();

        for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
            let entry = entry.map_err(|e| Error::io(path, e))?;
            let entry_path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&entry_path, e))?;

            let (is_file, is_dir) = if file_type.is_symlink() {
                match fs::metadata(&entry_path) {
                    Ok(target) => (target.is_file(), target.is_dir()),
                    Err(e) => {
                        tracing::debug!(path = %entry_path.display(), error = %e, "Skipping dangling symlink");
                        continue;
                    }
                }
            } else {
                (file_type.is_file(), file_type.is_dir())
            };

            if is_file {
                listing.files.insert(entry.file_name());
            } else if is_dir {
                listing.directories.insert(entry.file_name());
            } else {
                tracing::debug!(path = %entry_path.display(), "Skipping special file");
            }
        }

        Ok(listing)
    }

    /// List a directory, returning `None` if it does not exist as a directory.
    pub fn read_if_exists(path: &Path) -> Result<Option<Self>> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Self::read(path).map(Some),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Regular file names, in a stable order.
    pub fn files(&self) -> impl Iterator<Item = &OsStr> {
        self.files.iter().map(OsString::as_os_str)
    }

    /// Subdirectory names, in a stable order.
    pub fn directories(&self) -> impl Iterator<Item = &OsStr> {
        self.directories.iter().map(OsString::as_os_str)
    }

    pub fn has_file(&self, name: &OsStr) -> bool {
        self.files.contains(name)
    }

    pub fn has_directory(&self, name: &OsStr) -> bool {
        self.directories.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}
