//! Sharding of flat frozen names into nested single-character directories.

/// Prefix `flat_name` with one directory per leading stem character.
///
/// At most `depth` directories are added, fewer if the stem is shorter.
/// `depth == 0` returns the name unchanged. Output always uses `/`.
///
/// # Examples
/// ```
/// use tola_freeze::freeze::shard_path;
/// assert_eq!(shard_path("ab12cd.ext", 2), "a/b/ab12cd.ext");
/// assert_eq!(shard_path("ab12cd.ext", 0), "ab12cd.ext");
/// ```
pub fn shard_path(flat_name: &str, depth: usize) -> String {
    if depth == 0 {
        return flat_name.to_string();
    }

    let stem = match flat_name.rfind('.') {
        Some(pos) if pos > 0 => &flat_name[..pos],
        _ => flat_name,
    };

    let mut out = String::with_capacity(flat_name.len() + depth * 2);
    for c in stem.chars().take(depth) {
        out.push(c);
        out.push('/');
    }
    out.push_str(flat_name);
    out
}
