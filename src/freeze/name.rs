//! Content-derived file names.
//!
//! The digest of a file's exact bytes is its frozen identity: identical
//! bytes always get the identical name, whatever path they came from.

use sha1::{Digest, Sha1};

use crate::config::HashAlgorithm;

/// Hex digest of `contents` with the given algorithm.
pub fn content_digest(contents: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha1 => hex::encode(Sha1::digest(contents)),
        HashAlgorithm::Blake3 => blake3::hash(contents).to_hex().to_string(),
    }
}

/// Frozen file name: digest of `contents` followed by `extension`.
///
/// `extension` includes its leading dot (`.png`) or is empty.
///
/// # Examples
/// ```
/// use tola_freeze::config::HashAlgorithm;
/// use tola_freeze::freeze::content_file_name;
/// assert_eq!(
///     content_file_name(b"abc", ".png", HashAlgorithm::Sha1),
///     "a9993e364706816aba3e25717850c26c9cd0d89d.png"
/// );
/// ```
#[inline]
pub fn content_file_name(contents: &[u8], extension: &str, algorithm: HashAlgorithm) -> String {
    let mut name = content_digest(contents, algorithm);
    name.push_str(extension);
    name
}
