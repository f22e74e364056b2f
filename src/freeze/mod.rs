//! Content-addressed link freezing.
//!
//! Local files referenced from text assets are copied to immutable,
//! content-derived paths and the references are rewritten to point at them:
//!
//! ```text
//! url("img/logo.png?v=2")  ──►  url("a/a9993e36….png?v=2")
//! ```
//!
//! # Layout
//!
//! | Module    | Role                                              |
//! |-----------|---------------------------------------------------|
//! | `url`     | split off `?query` / `#fragment`                  |
//! | `name`    | digest-based file names                           |
//! | `shard`   | single-character shard directories                |
//! | `map`     | freeze map and its base-directory resolver        |
//! | `stream`  | ordered asset stream shared by the run            |
//! | `link`    | per-URL freezing                                  |
//! | `session` | session state, run iterator, standalone resolver  |

mod error;
mod link;
mod map;
mod name;
mod session;
mod shard;
mod stream;
mod url;

#[cfg(test)]
mod tests;

pub use error::FreezeError;
pub use link::{ExternalUrl, FreezeHook, LinkFreezer, UrlClassifier, relink};
pub use map::{FreezeMap, FreezeMapResolver};
pub use name::{content_digest, content_file_name};
pub use session::{
    FreezeRun, FreezeSession, MainTransform, StandaloneResolver, passthrough, resolve_standalone,
};
pub use shard::shard_path;
pub use stream::AssetStream;
pub use url::UrlParts;
