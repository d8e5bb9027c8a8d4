//! Append-only activity log written by the control dispatcher.
//!
//! # Invariants
//! - The file is created once with `INITIAL_LINE`; afterwards it is only
//!   appended to, never truncated or rotated.
//! - One `append_line` call writes exactly one `\n`-terminated line.

use super::{StorageError, StorageResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

pub const INITIAL_LINE: &str = "log file created";

#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the log with its initial line when absent.
    ///
    /// Returns `true` when the file was created by this call. Missing parent
    /// directories are created first.
    pub fn ensure_exists(&self) -> StorageResult<bool> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StorageError::io(parent, err))?;
        }

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => return Err(StorageError::io(&self.path, err)),
        };

        file.write_all(format!("{INITIAL_LINE}\n").as_bytes())
            .map_err(|err| StorageError::io(&self.path, err))?;
        Ok(true)
    }

    /// Appends `message` followed by a newline.
    pub fn append_line(&self, message: &str) -> StorageResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| StorageError::io(&self.path, err))?;

        file.write_all(format!("{message}\n").as_bytes())
            .map_err(|err| StorageError::io(&self.path, err))
    }
}
