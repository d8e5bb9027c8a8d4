//! Archive directory writer for `upload-core` blobs.
//!
//! # Invariants
//! - Entries live directly inside the archive directory; names are single
//!   file names (see `paths::resolve_entry_name`).
//! - Writing an existing name overwrites it; no index of entries is kept.

use super::paths::resolve_entry_name;
use super::{StorageError, StorageResult};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the archive directory when missing.
    ///
    /// Returns `true` when the directory did not exist before.
    pub fn ensure_dir(&self) -> StorageResult<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;
        Ok(true)
    }

    /// Writes `content` as the entry `name` and returns its path.
    pub fn upload(&self, name: &str, content: &str) -> StorageResult<PathBuf> {
        let path = resolve_entry_name(&self.dir, name).map_err(|reason| {
            StorageError::InvalidPath {
                name: name.to_string(),
                reason,
            }
        })?;

        fs::write(&path, content).map_err(|err| StorageError::io(&path, err))?;

        info!(
            "event=archive_upload module=storage status=ok path={} bytes={}",
            path.display(),
            content.len()
        );
        Ok(path)
    }
}
