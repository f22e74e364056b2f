//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`absolutize`, `clean`)
//! - [`relative`]: Relative paths and `/` canonicalization (`relative_to`, `to_slash`)
//! - [`route`]: URL classification (`is_external_url`, `has_scheme`)

pub mod fs;
pub mod relative;
pub mod route;

pub use fs::{absolutize, clean};
pub use relative::{relative_to, slash_str, to_slash};
