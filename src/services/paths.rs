//! Slash-path helpers shared by the collector, matcher and root resolver.
//!
//! All virtual paths are slash-separated with no leading or trailing slash;
//! `""` denotes the archive root.

/// Normalize an archive entry name: backslashes to slashes, no leading or
/// trailing separators.
pub fn normalize(raw: &str) -> String {
    raw.replace('\\', "/")
        .trim_matches('/')
        .split('/')
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parent directory of `path`, `""` for a top-level entry.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final path segment, `""` for the archive root.
pub fn leaf(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Whether `path` equals `root` or lies beneath it (segment-wise, so
/// `ab/x` is not under `a`). An empty root contains everything.
pub fn is_at_or_under(path: &str, root: &str) -> bool {
    if root.is_empty() {
        return true;
    }
    path == root || (path.len() > root.len() && path.starts_with(root) && path.as_bytes()[root.len()] == b'/')
}

/// Whether `path` lies strictly beneath `root`.
pub fn is_under(path: &str, root: &str) -> bool {
    path != root && is_at_or_under(path, root)
}

/// Whether one path is an ancestor of the other (or they are equal),
/// compared segment-by-segment.
pub fn is_related(a: &str, b: &str) -> bool {
    is_at_or_under(a, b) || is_at_or_under(b, a)
}

fn strip_zip_suffix(segment: &str) -> &str {
    let len = segment.len();
    if len > 4 && segment[len - 4..].eq_ignore_ascii_case(".zip") {
        &segment[..len - 4]
    } else {
        segment
    }
}

/// Whether a segment carries a `.zip` suffix (case-insensitive).
pub fn has_zip_suffix(segment: &str) -> bool {
    strip_zip_suffix(segment).len() != segment.len()
}

/// `StudentA.zip/inner.zip/Intra` -> `StudentA/inner/Intra`.
pub fn strip_zip_all_segments(path: &str) -> String {
    path.split('/')
        .map(strip_zip_suffix)
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip `.zip` only where it abuts a separator, so a trailing archive
/// name keeps its extension: `StudentA.zip/Intra.zip` -> `StudentA/Intra.zip`.
pub fn strip_zip_before_separator(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| if i < last { strip_zip_suffix(seg) } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}

/// Longest common ancestor of a set of paths, compared segment-by-segment
/// (never by raw string prefix). Returns `""` when nothing is shared.
pub fn common_ancestor<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut iter = paths.into_iter();
    let first = match iter.next() {
        Some(p) => p,
        None => return String::new(),
    };
    let mut common: Vec<&str> = first.split('/').collect();
    for path in iter {
        let segments: Vec<&str> = path.split('/').collect();
        let shared = common
            .iter()
            .zip(segments.iter())
            .take_while(|(a, b)| a == b)
            .count();
        common.truncate(shared);
        if common.is_empty() {
            return String::new();
        }
    }
    common.join("/")
}

#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod tests;
