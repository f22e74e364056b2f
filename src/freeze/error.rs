//! Freeze error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while freezing links or resolving a freeze map.
#[derive(Debug, Error)]
pub enum FreezeError {
    /// A local link points at a file that does not exist or cannot be read.
    #[error("cannot freeze `{url}`: unable to read `{}`", path.display())]
    MissingAsset {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A serialized freeze map is not a JSON object of strings.
    #[error("malformed freeze map `{}`", path.display())]
    MalformedMap {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize freeze map")]
    Serialize(#[from] serde_json::Error),

    /// The caller's main transform failed for one asset.
    #[error("failed to process `{}`", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl FreezeError {
    /// Check if this error (or the transform failure it wraps) is a missing asset.
    pub fn is_missing_asset(&self) -> bool {
        match self {
            Self::MissingAsset { .. } => true,
            Self::Transform { source, .. } => source
                .downcast_ref::<FreezeError>()
                .is_some_and(FreezeError::is_missing_asset),
            _ => false,
        }
    }
}
