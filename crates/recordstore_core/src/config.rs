//! Storage configuration shared by every core component.
//!
//! # Responsibility
//! - Hold the filesystem locations the service reads and writes.
//! - Provide the default layout used when no overrides are supplied.
//!
//! # Invariants
//! - Components receive a `StorageConfig` at construction and never consult
//!   process-global paths.

use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE: &str = "core_system.db";
pub const DEFAULT_LOG_FILE: &str = "core_log.txt";
pub const DEFAULT_ARCHIVE_DIR: &str = "Archive";
pub const DEFAULT_WORKSPACE_DIR: &str = ".";

/// Filesystem layout for the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// SQLite database file holding the `files` table.
    pub db_path: PathBuf,
    /// Append-only activity log written by `log_message`.
    pub log_file: PathBuf,
    /// Directory receiving `upload-core` blobs.
    pub archive_dir: PathBuf,
    /// Root that `update_file` filenames resolve against.
    pub workspace_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            workspace_dir: PathBuf::from(DEFAULT_WORKSPACE_DIR),
        }
    }
}

impl StorageConfig {
    /// Places the default layout under `root`.
    ///
    /// The workspace directory becomes `root` itself.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            db_path: root.join(DEFAULT_DB_FILE),
            log_file: root.join(DEFAULT_LOG_FILE),
            archive_dir: root.join(DEFAULT_ARCHIVE_DIR),
            workspace_dir: root.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StorageConfig;
    use std::path::Path;

    #[test]
    fn default_layout_uses_relative_literals() {
        let config = StorageConfig::default();
        assert_eq!(config.db_path, Path::new("core_system.db"));
        assert_eq!(config.log_file, Path::new("core_log.txt"));
        assert_eq!(config.archive_dir, Path::new("Archive"));
        assert_eq!(config.workspace_dir, Path::new("."));
    }

    #[test]
    fn rooted_layout_keeps_every_path_under_root() {
        let config = StorageConfig::rooted_at("/srv/records");
        for path in [&config.db_path, &config.log_file, &config.archive_dir] {
            assert!(path.starts_with("/srv/records"));
        }
        assert_eq!(config.workspace_dir, Path::new("/srv/records"));
    }
}
