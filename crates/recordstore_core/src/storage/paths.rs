//! Resolution of caller-supplied file names against a fixed root.
//!
//! Archive entries must be a single file name. Workspace files may be nested
//! relative paths. Neither may climb out of the root or name an absolute path.

use std::fmt::{Display, Formatter};
use std::path::{Component, Path, PathBuf};

/// Why a caller-supplied name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRejection {
    Empty,
    Absolute,
    Traversal,
    Separator,
    /// Resolves to a file the service itself owns.
    Reserved,
}

impl Display for PathRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "name is empty"),
            Self::Absolute => write!(f, "absolute paths are not allowed"),
            Self::Traversal => write!(f, "`.` and `..` segments are not allowed"),
            Self::Separator => write!(f, "path separators are not allowed"),
            Self::Reserved => write!(f, "target is owned by the record store"),
        }
    }
}

/// Resolves an archive entry name to `dir/name`.
///
/// The name must be exactly one plain file name.
pub fn resolve_entry_name(dir: &Path, name: &str) -> Result<PathBuf, PathRejection> {
    if name.is_empty() {
        return Err(PathRejection::Empty);
    }
    if name.contains(['/', '\\']) {
        return Err(if name.starts_with(['/', '\\']) {
            PathRejection::Absolute
        } else {
            PathRejection::Separator
        });
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file_name)), None) => Ok(dir.join(file_name)),
        (Some(Component::Prefix(_) | Component::RootDir), _) => Err(PathRejection::Absolute),
        _ => Err(PathRejection::Traversal),
    }
}

/// Resolves a relative file path under `root`.
///
/// `.` segments are dropped; `..`, roots and drive prefixes are refused.
pub fn resolve_relative_path(root: &Path, name: &str) -> Result<PathBuf, PathRejection> {
    let mut resolved = root.to_path_buf();
    let mut has_file_name = false;

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                has_file_name = true;
            }
            Component::CurDir => {}
            Component::ParentDir => return Err(PathRejection::Traversal),
            Component::RootDir | Component::Prefix(_) => return Err(PathRejection::Absolute),
        }
    }

    if has_file_name {
        Ok(resolved)
    } else {
        Err(PathRejection::Empty)
    }
}

/// Absolute form of `path` without `.` segments, for equality checks.
///
/// Purely lexical; falls back to `path` when the working directory is unknown.
pub(crate) fn comparable_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether `a` and `b` name the same file, lexically or after symlink resolution.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    if comparable_path(a) == comparable_path(b) {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
