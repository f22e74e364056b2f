//! Stylesheet `url()` freezing.
//!
//! | Input                    | Output                       |
//! |--------------------------|------------------------------|
//! | `url(img/a.png)`         | `url(a/a1b2….png)`           |
//! | `url("font.woff?#iefix")`| `url("f/f00d….woff?#iefix")` |
//! | `url('https://cdn/x')`   | unchanged                    |

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::bytes::{Captures, Match, Regex};

use crate::asset::Asset;
use crate::freeze::{AssetStream, FreezeError, LinkFreezer, MainTransform, relink};

// Byte-oriented and ASCII-only: stylesheets need not be valid UTF-8.
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?-u)[uU][rR][lL]\([ \t\r\n\x0C]*(?:"([^"]*)"|'([^']*)'|([^)"' \t\r\n\x0C]*))[ \t\r\n\x0C]*\)"#,
    )
    .unwrap()
});

/// Replace the target of every `url(...)` token in `css` with `f(target)`.
///
/// Quote style is preserved. Tokens whose target comes back unchanged, or
/// is not valid UTF-8, are copied verbatim. Returns the input borrowed when
/// nothing changed. The first error from `f` aborts the rewrite.
pub fn rewrite_urls<E>(
    css: &[u8],
    mut f: impl FnMut(&str) -> Result<String, E>,
) -> Result<Cow<'_, [u8]>, E> {
    let mut out = Vec::with_capacity(css.len());
    let mut last = 0;
    let mut changed = false;

    for caps in RE_URL.captures_iter(css) {
        let (Some(token), Some((quote, target))) = (caps.get(0), url_target(&caps)) else {
            continue;
        };
        let Ok(target) = std::str::from_utf8(target.as_bytes()) else {
            continue;
        };

        let replaced = f(target)?;
        if replaced == target {
            continue;
        }

        out.extend_from_slice(&css[last..token.start()]);
        out.extend_from_slice(b"url(");
        out.extend_from_slice(quote.as_bytes());
        out.extend_from_slice(replaced.as_bytes());
        out.extend_from_slice(quote.as_bytes());
        out.push(b')');
        last = token.end();
        changed = true;
    }

    if !changed {
        return Ok(Cow::Borrowed(css));
    }
    out.extend_from_slice(&css[last..]);
    Ok(Cow::Owned(out))
}

fn url_target<'h>(caps: &Captures<'h>) -> Option<(&'static str, Match<'h>)> {
    caps.get(1)
        .map(|m| ("\"", m))
        .or_else(|| caps.get(2).map(|m| ("'", m)))
        .or_else(|| caps.get(3).map(|m| ("", m)))
}

// =============================================================================
// Session Transform
// =============================================================================

/// Freezes the `url()` references of `.css` assets and forwards every asset.
///
/// Frozen URLs are relative to the output root. With
/// [`relinking`](Self::relinking) they are re-expressed relative to the
/// stylesheet, whose `path` must then be relative to that same root.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssTransform {
    relink: bool,
}

impl CssTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relinking() -> Self {
        Self { relink: true }
    }

    fn freeze_urls<'a>(
        &self,
        asset: &Asset,
        css: &'a [u8],
        freezer: &LinkFreezer<'_>,
        stream: &AssetStream,
    ) -> Result<Cow<'a, [u8]>, FreezeError> {
        rewrite_urls(css, |url| {
            let staged = stream.len();
            let frozen = freezer.freeze_link(asset, stream, url, None)?;
            if self.relink && stream.len() > staged {
                Ok(relink(&asset.path, &frozen))
            } else {
                Ok(frozen)
            }
        })
    }
}

fn is_stylesheet(asset: &Asset) -> bool {
    asset.extension().eq_ignore_ascii_case(".css")
}

impl MainTransform for CssTransform {
    fn transform(
        &mut self,
        mut asset: Asset,
        freezer: &LinkFreezer<'_>,
        stream: &AssetStream,
    ) -> anyhow::Result<()> {
        if is_stylesheet(&asset)
            && let Some(css) = asset.contents.as_deref()
        {
            let rewritten = match self.freeze_urls(&asset, css, freezer, stream)? {
                Cow::Owned(bytes) => Some(bytes),
                Cow::Borrowed(_) => None,
            };
            if let Some(bytes) = rewritten {
                asset.contents = Some(bytes);
            }
        }
        stream.push(asset);
        Ok(())
    }
}
