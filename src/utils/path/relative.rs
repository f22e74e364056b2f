//! Relative path computation and separator canonicalization.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use super::fs::absolutize;

/// Compute `target` relative to the directory `base`.
///
/// Both sides are made absolute first (relative inputs are taken from the
/// current directory). Identical paths yield an empty path.
///
/// # Examples
/// ```ignore
/// relative_to(Path::new("/site"), Path::new("/site/a/img.png")) // "a/img.png"
/// relative_to(Path::new("/site/css"), Path::new("/site/img"))   // "../img"
/// ```
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base = absolutize(base);
    let target = absolutize(target);

    let common = base
        .components()
        .zip(target.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in base.components().skip(common) {
        out.push("..");
    }
    for comp in target.components().skip(common) {
        out.push(comp.as_os_str());
    }
    out
}

/// Render a path with `/` separators regardless of platform.
///
/// The platform separator is matched literally, so `\` on Windows is
/// replaced as a plain character.
#[inline]
pub fn to_slash(path: &Path) -> String {
    slash_str(&path.to_string_lossy())
}

/// Replace the platform separator in an already-rendered path string.
#[inline]
pub fn slash_str(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}
