//! Main transforms for freeze sessions.
//!
//! - `css`: rewrites `url(...)` references in stylesheets

mod css;

pub use css::{CssTransform, rewrite_urls};
