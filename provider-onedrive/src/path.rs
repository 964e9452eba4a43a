//! Path helpers for Graph item-path addressing
//!
//! Adapter paths are slash-separated and relative to the drive root. Graph
//! addresses them as `root:/{path}` with each segment percent-encoded.

/// Normalize a Graph prefix to `/{prefix}/`, or `/` when empty.
///
/// ```
/// use provider_onedrive::path::normalize_prefix;
///
/// assert_eq!(normalize_prefix("users/42/drive"), "/users/42/drive/");
/// assert_eq!(normalize_prefix("//drives/b!x//"), "/drives/b!x/");
/// assert_eq!(normalize_prefix(""), "/");
/// ```
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

pub fn trim_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Split into `(dirname, basename)`; the dirname of a top-level item is empty.
pub fn split_path(path: &str) -> (&str, &str) {
    let path = trim_path(path);
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Non-empty segments of a path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Join a directory and a name without introducing a leading slash
pub fn join_path(directory: &str, name: &str) -> String {
    let directory = trim_path(directory);
    if directory.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", directory, name)
    }
}

/// Percent-encode each segment, keeping the separators
pub fn encode_path(path: &str) -> String {
    segments(path)
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
