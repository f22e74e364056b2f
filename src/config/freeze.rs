//! `[freeze]` section configuration.
//!
//! Controls how linked files are frozen and how the freeze map is written.
//!
//! # Example
//!
//! ```toml
//! [freeze]
//! nesting_level = 1                 # Shard depth: 0 = flat, 2 = a/b/ab12....png
//! map_file_name = "freeze-map.json" # Name of the emitted mapping file
//! map_base_dir = "."                # Relative map keys (unset = absolute paths)
//! on_missing = "keep"               # Missing linked file: keep | error
//! hash = "sha1"                     # Frozen name digest: sha1 | blake3
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, ConfigError};
use crate::utils::path::absolutize;

/// Deepest shard level that still splits a blake3 digest.
const MAX_USEFUL_NESTING: usize = 64;

// ============================================================================
// Enums
// ============================================================================

/// Policy for links whose local file cannot be read.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Leave the URL untouched and emit nothing.
    #[default]
    Keep,
    /// Fail the referencing asset with `FreezeError::MissingAsset`.
    Error,
}

/// Digest used to derive frozen file names.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 160-bit SHA-1, 40 hex chars.
    #[default]
    Sha1,
    /// 256-bit BLAKE3, 64 hex chars.
    Blake3,
}

impl HashAlgorithm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest this algorithm produces.
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Blake3 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!("unknown hash `{other}` (expected sha1 or blake3)")),
        }
    }
}

// ============================================================================
// FreezeConfig
// ============================================================================

/// Settings for one freeze session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "freeze")]
pub struct FreezeConfig {
    /// Shard directory depth for frozen files (0 disables sharding).
    #[config(default = "1")]
    pub nesting_level: usize,

    /// File name of the emitted freeze map.
    #[config(default = "freeze-map.json")]
    pub map_file_name: String,

    /// Base directory for relative freeze map paths (unset keeps absolute source paths).
    pub map_base_dir: Option<PathBuf>,

    /// Missing linked file policy: keep | error.
    #[config(default = "keep")]
    pub on_missing: MissingPolicy,

    /// Frozen name digest: sha1 | blake3.
    #[config(default = "sha1")]
    pub hash: HashAlgorithm,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            nesting_level: 1,
            map_file_name: "freeze-map.json".into(),
            map_base_dir: None,
            on_missing: MissingPolicy::Keep,
            hash: HashAlgorithm::Sha1,
        }
    }
}

/// Field-by-field overrides applied on top of a [`FreezeConfig`].
#[derive(Debug, Clone, Default)]
pub struct FreezeOverrides {
    pub nesting_level: Option<usize>,
    pub map_file_name: Option<String>,
    pub map_base_dir: Option<PathBuf>,
    pub on_missing: Option<MissingPolicy>,
    pub hash: Option<HashAlgorithm>,
}

impl FreezeConfig {
    /// Build a validated config from defaults plus overrides.
    pub fn new(overrides: FreezeOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge(overrides);
        config.check()?;
        Ok(config)
    }

    /// Apply overrides. Fields left `None` keep their current value.
    pub fn merge(&mut self, overrides: FreezeOverrides) {
        Self::update_option(&mut self.nesting_level, overrides.nesting_level);
        Self::update_option(&mut self.map_file_name, overrides.map_file_name);
        Self::update_option(&mut self.on_missing, overrides.on_missing);
        Self::update_option(&mut self.hash, overrides.hash);
        if let Some(dir) = overrides.map_base_dir.filter(|dir| !is_blank_dir(dir)) {
            self.map_base_dir = Some(dir);
        }
    }

    fn update_option<T>(config_option: &mut T, cli_option: Option<T>) {
        if let Some(option) = cli_option {
            *config_option = option;
        }
    }

    /// Resolve a relative `map_base_dir` against `root`.
    ///
    /// A blank `map_base_dir` counts as unset.
    pub fn normalize(&mut self, root: &Path) {
        self.map_base_dir = self
            .map_base_dir
            .take()
            .filter(|dir| !is_blank_dir(dir))
            .map(|dir| absolutize(&root.join(dir)));
    }

    /// Run validation and fold diagnostics into a [`ConfigError`].
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Validate freeze settings.
    ///
    /// # Checks
    /// - `map_file_name` must name a file
    /// - `nesting_level` beyond any digest length only produces a hint
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let name = self.map_file_name.trim();
        if name.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.map_file_name,
                format!("{} must not be empty", Self::FIELDS.map_file_name),
                "remove the field to use `freeze-map.json`",
            );
        } else if name.ends_with('/') || name.ends_with('\\') || name == "." || name == ".." {
            diag.error(
                Self::FIELDS.map_file_name,
                format!("'{name}' is a directory, not a file name"),
            );
        }

        if self.nesting_level > MAX_USEFUL_NESTING {
            diag.hint(
                Self::FIELDS.nesting_level,
                format!(
                    "{} is longer than any digest, sharding stops at the digest length",
                    self.nesting_level
                ),
            );
        }
    }
}

/// Empty or whitespace-only directory setting.
pub(crate) fn is_blank_dir(dir: &Path) -> bool {
    dir.as_os_str().to_string_lossy().trim().is_empty()
}
