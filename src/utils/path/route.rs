//! URL classification helpers.
//!
//! Link type detection (external vs local) for references found in
//! stylesheets and similar text assets.

/// Check if a link has a URL scheme like `http:`, `data:`, `mailto:`.
///
/// A valid scheme must:
/// - Start with an ASCII letter and be at least 2 characters long, so
///   Windows drive paths like `C:/img/a.png` stay local
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// # Examples
/// ```
/// use tola_freeze::utils::path::route::has_scheme;
/// assert!(has_scheme("https://example.com"));
/// assert!(has_scheme("data:image/png;base64,AAAA"));
/// assert!(!has_scheme("/about"));
/// assert!(!has_scheme("./file.txt"));
/// assert!(!has_scheme("C:/img/a.png"));
/// ```
#[inline]
pub fn has_scheme(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        let scheme = &link[..pos];
        scheme.len() > 1
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Check if a link is already resolvable without a local file lookup.
///
/// External links are: scheme URLs (`https:`, `data:`), protocol-relative
/// URLs (`//cdn.example.com/x.png`), fragment-only references (`#icon`)
/// and empty strings.
///
/// # Examples
/// ```
/// use tola_freeze::utils::path::route::is_external_url;
/// assert!(is_external_url("//cdn.example.com/a.png"));
/// assert!(is_external_url("#gradient"));
/// assert!(!is_external_url("../img/a.png?v=2"));
/// ```
#[inline]
pub fn is_external_url(link: &str) -> bool {
    let link = link.trim();
    link.is_empty() || link.starts_with("//") || link.starts_with('#') || has_scheme(link)
}
