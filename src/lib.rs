//! tola-freeze - content-addressed asset freezing for static sites.
//!
//! Files linked from text assets are copied to immutable paths derived from
//! their content, the links are rewritten, and a freeze map records where
//! every source file went.
//!
//! - [`freeze`]: sessions, link freezing and the freeze map
//! - [`transform`]: ready-made main transforms (CSS `url()`)
//! - [`config`]: `freeze.toml` loading and validation
//! - [`cli`]: the `tola-freeze` command line

pub mod asset;
pub mod cli;
pub mod config;
pub mod freeze;
pub mod logger;
pub mod transform;
pub mod utils;
