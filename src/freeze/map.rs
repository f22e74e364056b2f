//! Freeze map: original source path → frozen path.
//!
//! Collected with absolute source paths, then re-expressed relative to a
//! configured base directory by [`FreezeMapResolver`] so consumers do not
//! depend on build-machine paths.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::FreezeError;
use crate::config::FreezeConfig;
use crate::utils::path::{relative_to, slash_str, to_slash};

// ============================================================================
// FreezeMap
// ============================================================================

/// Mapping from original source path to frozen path.
///
/// Keys are unique; recording the same source twice keeps the last value,
/// which is identical anyway since frozen names are content-derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreezeMap(BTreeMap<String, String>);

impl FreezeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `source → frozen`, returning the previous frozen path.
    pub fn insert(&mut self, source: impl Into<String>, frozen: impl Into<String>) -> Option<String> {
        self.0.insert(source.into(), frozen.into())
    }

    /// Record a frozen asset's paths.
    pub fn record(&mut self, source: &Path, frozen: &Path) -> Option<String> {
        self.insert(
            source.to_string_lossy().into_owned(),
            frozen.to_string_lossy().into_owned(),
        )
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.0.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pretty-printed JSON (two-space indent, keys sorted).
    pub fn to_json(&self) -> Result<Vec<u8>, FreezeError> {
        Ok(serde_json::to_vec_pretty(&self.0)?)
    }

    /// Parse a serialized map. JSON `null` is read as an empty map.
    ///
    /// `path` only labels the error.
    pub fn from_json(bytes: &[u8], path: &Path) -> Result<Self, FreezeError> {
        serde_json::from_slice::<Option<Self>>(bytes)
            .map(Option::unwrap_or_default)
            .map_err(|source| FreezeError::MalformedMap {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl FromIterator<(String, String)> for FreezeMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// FreezeMapResolver
// ============================================================================

/// Re-expresses a [`FreezeMap`] relative to a base directory.
///
/// Without a base directory every resolution is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreezeMapResolver<'a> {
    base_dir: Option<&'a Path>,
}

impl<'a> FreezeMapResolver<'a> {
    pub const fn new(base_dir: Option<&'a Path>) -> Self {
        Self { base_dir }
    }

    pub fn from_config(config: &'a FreezeConfig) -> Self {
        Self::new(config.map_base_dir.as_deref())
    }

    /// Check if a base directory is configured.
    pub const fn is_enabled(&self) -> bool {
        self.base_dir.is_some()
    }

    /// Resolve `map` against the base directory.
    ///
    /// - keys: made relative to the base, unless `keep_source_keys`, in
    ///   which case they only get `/` separators
    /// - values: with `destination`, joined onto it and made relative to
    ///   the base; otherwise kept, with `/` separators
    ///
    /// An absent map resolves to an empty one.
    pub fn resolve(
        &self,
        map: Option<&FreezeMap>,
        destination: Option<&Path>,
        keep_source_keys: bool,
    ) -> FreezeMap {
        let Some(base) = self.base_dir else {
            return map.cloned().unwrap_or_default();
        };
        let Some(map) = map else {
            return FreezeMap::new();
        };

        map.iter()
            .map(|(source, frozen)| {
                let key = if keep_source_keys {
                    slash_str(source)
                } else {
                    to_slash(&relative_to(base, Path::new(source)))
                };

                let value = match destination {
                    Some(dest) => {
                        let joined = dest.join(frozen.trim_start_matches('/'));
                        to_slash(&relative_to(base, &joined))
                    }
                    None => slash_str(frozen),
                };

                (key, value)
            })
            .collect()
    }
}
