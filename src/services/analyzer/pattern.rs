//! Name patterns for template nodes.
//!
//! Supported forms: a literal name, a bare `*` (any one path segment), and
//! a single `*` splitting the segment into a required prefix and suffix
//! (`settings.gradle*`, `*.sln`). Anything else — including a second `*` —
//! is matched literally rather than given glob semantics.

/// Whether one path segment satisfies a node's name pattern.
pub fn segment_matches(pattern: &str, name: &str) -> bool {
    match pattern.find('*') {
        None => pattern == name,
        Some(star) => {
            let (prefix, suffix) = (&pattern[..star], &pattern[star + 1..]);
            if suffix.contains('*') {
                // multiple wildcards are not a supported form
                return pattern == name;
            }
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
    }
}

#[cfg(test)]
#[path = "tests/pattern_tests.rs"]
mod tests;
