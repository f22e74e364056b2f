//! Filesystem path normalization.
//!
//! Lexical only: symlinks are never resolved, so the same input always
//! maps to the same path whether or not it exists.
//!
//! - `absolutize` - absolute form, relative to the current directory
//! - `clean` - resolve `.` and `..` components

use std::path::{Component, Path, PathBuf};

/// Make a path absolute without consulting the filesystem.
///
/// Relative paths are joined onto the current directory, then cleaned.
/// Symlinks are not resolved, so `/site/a/../b` always becomes `/site/b`.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        clean(&cwd.join(path))
    }
}

/// Lexically resolve `.` and `..` components.
///
/// A `..` directly under the root is dropped (`/..` is `/`); leading `..`
/// of a relative path are preserved.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
