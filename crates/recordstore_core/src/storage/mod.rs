//! Filesystem side of the record store.
//!
//! # Responsibility
//! - Write archive blobs, workspace files and activity-log lines.
//! - Bootstrap the database, archive directory and activity log at startup.
//!
//! # Invariants
//! - Caller-supplied names never resolve outside their configured root.
//! - Every write is a single unscoped I/O call; partial writes are not undone.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod activity_log;
pub mod archive;
pub mod init;
pub mod paths;
pub mod workspace;

pub use activity_log::ActivityLog;
pub use archive::ArchiveWriter;
pub use init::{initialize_storage, InitError, InitResult, StorageReport};
pub use paths::PathRejection;
pub use workspace::WorkspaceFiles;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Caller-supplied name was refused before touching the filesystem.
    InvalidPath {
        name: String,
        reason: PathRejection,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { name, reason } => write!(f, "invalid path `{name}`: {reason}"),
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPath { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}
