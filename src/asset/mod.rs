//! File units flowing through a freeze pipeline.
//!
//! An [`Asset`] is created either by the upstream producer (stylesheets
//! and other pre-existing files) or by the link freezer (newly discovered
//! linked files, which carry a `source_path`).

mod kind;

pub use kind::{AssetKind, SessionId};

use std::path::{Path, PathBuf};

/// A file in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Output location. Relative paths are relative to the output root.
    pub path: PathBuf,
    /// Root used to resolve relative references found in `contents`.
    pub base: PathBuf,
    /// File bytes. `None` until populated (e.g. the freeze map placeholder).
    pub contents: Option<Vec<u8>>,
    /// Original on-disk location, set only on frozen assets.
    pub source_path: Option<PathBuf>,
    pub kind: AssetKind,
}

impl Asset {
    /// Create a regular asset without contents.
    pub fn new(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents: None,
            source_path: None,
            kind: AssetKind::Regular,
        }
    }

    /// Create the freeze map placeholder for `session`.
    pub fn freeze_map(path: impl Into<PathBuf>, session: SessionId) -> Self {
        Self {
            kind: AssetKind::FreezeMap(session),
            ..Self::new(path, ".")
        }
    }

    /// Read a regular asset from disk.
    ///
    /// `path` is kept as given; `base` becomes the directory references
    /// inside the file are resolved against.
    pub fn read(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let contents = std::fs::read(&path)?;
        Ok(Self::new(path, base).with_contents(contents))
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Contents decoded as UTF-8 (lossy). `None` without contents.
    pub fn text(&self) -> Option<String> {
        self.contents
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Check if this asset was produced by freezing a linked file.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.source_path.is_some()
    }

    /// Check if this is the freeze map placeholder of `session`.
    #[inline]
    pub fn is_freeze_map_of(&self, session: SessionId) -> bool {
        self.kind == AssetKind::FreezeMap(session)
    }

    /// File extension with leading dot (`.png`), empty when absent.
    pub fn extension(&self) -> &str {
        extension_of(&self.path)
    }
}

/// Extension of `path` including the leading dot.
///
/// Dotfiles such as `.htaccess` have no extension; `file.` has `.`.
pub fn extension_of(path: &Path) -> &str {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return "";
    };
    match name.rfind('.') {
        Some(0) | None => "",
        Some(pos) => &name[pos..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/site/image.png")), ".png");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new(".htaccess")), "");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new("file.")), ".");
    }

    #[test]
    fn test_freeze_map_kind() {
        let session = SessionId::next();
        let asset = Asset::freeze_map("freeze-map.json", session);
        assert!(asset.is_freeze_map_of(session));
        assert!(!asset.is_freeze_map_of(SessionId::next()));
        assert!(asset.contents.is_none());
        assert!(!asset.is_frozen());
    }

    #[test]
    fn test_text() {
        let asset = Asset::new("a.css", ".").with_contents("body{}");
        assert_eq!(asset.text().as_deref(), Some("body{}"));
        assert_eq!(Asset::new("b.css", ".").text(), None);
    }
}
