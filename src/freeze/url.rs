//! Query/fragment preserving URL split.

/// A URL split into its path and verbatim `?query#fragment` suffix.
///
/// Nothing is decoded or validated: `path + query` is always the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub path: &'a str,
    /// Everything from the first `?` or `#` onward, delimiter included.
    pub query: &'a str,
}

impl<'a> UrlParts<'a> {
    /// Split `raw` at the first `?` or `#`.
    ///
    /// # Examples
    /// ```
    /// use tola_freeze::freeze::UrlParts;
    /// let parts = UrlParts::parse("fonts/a.woff?#iefix");
    /// assert_eq!(parts.path, "fonts/a.woff");
    /// assert_eq!(parts.query, "?#iefix");
    /// ```
    pub fn parse(raw: &'a str) -> Self {
        let (path, query) = raw
            .find(|c| c == '?' || c == '#')
            .map_or((raw, ""), |pos| raw.split_at(pos));
        Self { path, query }
    }
}
