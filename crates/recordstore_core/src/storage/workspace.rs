//! Workspace file writer used by the `update_file` control action.
//!
//! # Invariants
//! - Reserved paths (the database and activity log) are never written here,
//!   whatever spelling of the name reaches them.

use super::paths::{resolve_relative_path, same_file, PathRejection};
use super::{StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct WorkspaceFiles {
    root: PathBuf,
    reserved: Vec<PathBuf>,
}

impl WorkspaceFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reserved: Vec::new(),
        }
    }

    /// Refuses future writes that resolve to `path`.
    pub fn reserving(mut self, path: impl Into<PathBuf>) -> Self {
        self.reserved.push(path.into());
        self
    }

    /// Creates or truncates `filename` under the root and writes `content`.
    ///
    /// Parent directories are not created.
    pub fn overwrite(&self, filename: &str, content: &str) -> StorageResult<PathBuf> {
        let rejected = |reason: PathRejection| StorageError::InvalidPath {
            name: filename.to_string(),
            reason,
        };
        let path = resolve_relative_path(&self.root, filename).map_err(rejected)?;
        if self.is_reserved(&path) {
            return Err(rejected(PathRejection::Reserved));
        }

        fs::write(&path, content).map_err(|err| StorageError::io(&path, err))?;
        Ok(path)
    }

    fn is_reserved(&self, path: &Path) -> bool {
        self.reserved.iter().any(|reserved| same_file(path, reserved))
    }
}

#[cfg(test)]
mod tests {
    use super::WorkspaceFiles;
    use crate::storage::{PathRejection, StorageError};
    use std::fs;

    #[test]
    fn reserved_file_is_refused_through_an_indirect_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let guarded = dir.path().join("guarded.txt");
        fs::write(&guarded, "keep").unwrap();

        let workspace =
            WorkspaceFiles::new(dir.path()).reserving(dir.path().join("sub/../guarded.txt"));

        for name in ["guarded.txt", "./guarded.txt"] {
            let err = workspace.overwrite(name, "").unwrap_err();
            assert!(matches!(
                err,
                StorageError::InvalidPath {
                    reason: PathRejection::Reserved,
                    ..
                }
            ));
        }
        assert_eq!(fs::read_to_string(&guarded).unwrap(), "keep");

        workspace.overwrite("other.txt", "ok").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("other.txt")).unwrap(),
            "ok"
        );
    }
}
