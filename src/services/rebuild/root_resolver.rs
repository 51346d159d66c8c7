//! Recomputes, at rebuild time, the directory a project's files actually
//! live under.
//!
//! The nominal root recorded during matching can drift from the virtual
//! file paths seen here: an external reader may have listed a nested
//! archive as `Student.zip/` while flattening names it `Student/`, or the
//! matched nodes may sit slightly off the nominal root. The resolver
//! reconciles both by anchoring on where the matched nodes were found.

use crate::services::archive::VirtualFile;
use crate::services::paths;
use crate::types::results::Project;

/// Ordered spellings of the nominal root, most literal first.
fn nominal_variants(nominal: &str) -> Vec<String> {
    let mut variants = vec![nominal.to_string()];
    for alt in [
        paths::strip_zip_all_segments(nominal),
        paths::strip_zip_before_separator(nominal),
    ] {
        if !variants.contains(&alt) {
            variants.push(alt);
        }
    }
    variants
}

fn has_files_at_or_under(files: &[VirtualFile], root: &str) -> bool {
    files.iter().any(|f| paths::is_at_or_under(&f.path, root))
}

fn is_file_path(files: &[VirtualFile], path: &str) -> bool {
    files.iter().any(|f| f.path == path)
}

/// Rephrase a match's found path in the naming the rebuild flattening
/// uses, when the literal spelling has no entries.
fn align_to_files(files: &[VirtualFile], path: &str) -> Option<String> {
    if has_files_at_or_under(files, path) {
        return Some(path.to_string());
    }
    let stripped = paths::strip_zip_all_segments(path);
    if stripped != path && has_files_at_or_under(files, &stripped) {
        return Some(stripped);
    }
    None
}

/// The directory a matched node pins the project to: the found path itself
/// for a directory, its parent for a file.
fn match_anchor(files: &[VirtualFile], found_path: &str) -> Option<String> {
    let aligned = align_to_files(files, found_path)?;
    if is_file_path(files, &aligned) {
        Some(paths::parent(&aligned).to_string())
    } else {
        Some(aligned)
    }
}

/// Resolve the effective root for one project against the flattened file
/// list. A root with zero files beneath it is a valid outcome; the project
/// then contributes nothing to the rebuild.
pub fn resolve_effective_root(project: &Project, files: &[VirtualFile]) -> String {
    let nominal = paths::normalize(&project.root_path);
    let variants = nominal_variants(&nominal);

    // Anchors from the node matches, kept only when they stay inside (or
    // above) one of the nominal spellings.
    let mut anchors: Vec<String> = Vec::new();
    for m in &project.matches {
        if m.found_path.is_empty() {
            continue;
        }
        let found = paths::normalize(&m.found_path);
        let Some(anchor) = match_anchor(files, &found) else {
            continue;
        };
        if !variants.iter().any(|v| paths::is_related(&anchor, v)) {
            continue;
        }
        if !anchors.contains(&anchor) {
            anchors.push(anchor);
        }
    }

    let root = if anchors.is_empty() {
        // Fall back to the first nominal spelling that has any files.
        variants
            .iter()
            .find(|v| has_files_at_or_under(files, v))
            .cloned()
            .unwrap_or(nominal)
    } else {
        paths::common_ancestor(anchors.iter().map(String::as_str))
    };

    // Rooting a project at a lone file is never intended; step up to the
    // parent once when siblings exist there. Applied at most once, never
    // recursively.
    if is_file_path(files, &root) {
        let parent = paths::parent(&root);
        let siblings = files
            .iter()
            .any(|f| f.path != root && paths::is_at_or_under(&f.path, parent));
        if siblings {
            return parent.to_string();
        }
    }

    root
}

#[cfg(test)]
#[path = "tests/root_resolver_tests.rs"]
mod tests;
