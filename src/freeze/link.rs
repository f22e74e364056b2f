//! Per-link freezing.
//!
//! For each URL handed over by a text rewriter:
//!
//! ```text
//! classify → resolve against base → read → name + shard → emit → rewritten URL
//! ```
//!
//! External URLs come back untouched. The rewritten URL keeps the original
//! `?query` / `#fragment` suffix.

use std::fs;
use std::path::{Path, PathBuf};

use super::{AssetStream, FreezeError, UrlParts, content_file_name, shard_path};
use crate::asset::{Asset, extension_of};
use crate::config::{FreezeConfig, MissingPolicy};
use crate::debug;
use crate::utils::path::{absolutize, clean, relative_to, to_slash};

// =============================================================================
// URL Classification
// =============================================================================

/// Decides whether a URL is already resolvable without a local lookup.
pub trait UrlClassifier {
    fn is_external(&self, url: &str) -> bool;
}

impl<F> UrlClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_external(&self, url: &str) -> bool {
        self(url)
    }
}

/// Default classifier: schemes, protocol-relative, fragment-only and empty URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalUrl;

impl UrlClassifier for ExternalUrl {
    fn is_external(&self, url: &str) -> bool {
        crate::utils::path::route::is_external_url(url)
    }
}

// =============================================================================
// LinkFreezer
// =============================================================================

/// Hook run on a freshly frozen asset before it enters the stream.
///
/// Receives the referencing asset, the stream, the original URL and the
/// new asset, which it may modify.
pub type FreezeHook<'h> = &'h mut dyn FnMut(&Asset, &AssetStream, &str, &mut Asset);

/// Freezes the local files referenced by an asset.
pub struct LinkFreezer<'a> {
    config: &'a FreezeConfig,
    classifier: &'a dyn UrlClassifier,
}

impl<'a> LinkFreezer<'a> {
    pub fn new(config: &'a FreezeConfig, classifier: &'a dyn UrlClassifier) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &FreezeConfig {
        self.config
    }

    /// Freeze the file behind `url` and return the replacement URL text.
    ///
    /// The frozen asset is pushed into `stream`; substituting the returned
    /// text into `referencing` is up to the caller.
    ///
    /// A missing or unreadable file follows `on_missing`: `keep` returns
    /// `url` unchanged without emitting anything, `error` fails with
    /// [`FreezeError::MissingAsset`].
    pub fn freeze_link(
        &self,
        referencing: &Asset,
        stream: &AssetStream,
        url: &str,
        hook: Option<FreezeHook<'_>>,
    ) -> Result<String, FreezeError> {
        if self.classifier.is_external(url) {
            return Ok(url.to_string());
        }

        let parts = UrlParts::parse(url);
        let source_path = absolutize(&referencing.base.join(parts.path));

        let contents = match fs::read(&source_path) {
            Ok(contents) => contents,
            Err(source) => {
                return match self.config.on_missing {
                    MissingPolicy::Keep => {
                        debug!("freeze"; "skipping `{}`: {} unreadable", url, source_path.display());
                        Ok(url.to_string())
                    }
                    MissingPolicy::Error => Err(FreezeError::MissingAsset {
                        url: url.to_string(),
                        path: source_path,
                        source,
                    }),
                };
            }
        };

        let file_name = content_file_name(&contents, extension_of(&source_path), self.config.hash);
        let file_path = shard_path(&file_name, self.config.nesting_level);

        let mut asset = Asset::new(PathBuf::from(&file_path), "").with_contents(contents);
        asset.source_path = Some(source_path);

        if let Some(hook) = hook {
            hook(referencing, stream, url, &mut asset);
        }

        debug!("freeze"; "{} -> {}", url, file_path);
        stream.push(asset);

        Ok(format!("{file_path}{}", parts.query))
    }
}

// =============================================================================
// Relinking
// =============================================================================

/// Re-express a frozen `url` relative to the directory of `referencing_path`.
///
/// Frozen URLs are relative to the output root. A referencing file written
/// into a subdirectory of that root needs them relative to itself.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use tola_freeze::freeze::relink;
/// assert_eq!(relink(Path::new("css/main.css"), "a/ab.png?v=2"), "../a/ab.png?v=2");
/// ```
pub fn relink(referencing_path: &Path, url: &str) -> String {
    let parts = UrlParts::parse(url);
    let url_path = Path::new(parts.path);
    let from = referencing_path.parent().unwrap_or(Path::new(""));
    let to = url_path.parent().unwrap_or(Path::new(""));

    let mut linked = relative_to(from, to);
    if let Some(name) = url_path.file_name() {
        linked.push(name);
    }

    format!("{}{}", to_slash(&clean(&linked)), parts.query)
}
