//! Flattens an archive (and any archives nested inside it) into one list of
//! virtual entries.

use crate::services::paths;
use crate::types::entry::ArchiveEntry;
use crate::types::errors::{CoreError, CoreResult};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};

/// Hard cap on archive-in-archive expansion. Bounds resource use against
/// crafted input; going past it fails the whole collection.
pub const MAX_NESTED_ARCHIVE_DEPTH: usize = 10;

/// A file after nested-archive flattening, with its bytes materialized.
pub struct VirtualFile {
    pub path: String,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct EntrySet {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Option<u64>>,
}

impl EntrySet {
    fn ensure_dir(&mut self, path: &str) {
        if !path.is_empty() {
            self.dirs.insert(path.to_string());
        }
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut current = paths::parent(path);
        while !current.is_empty() {
            if !self.dirs.insert(current.to_string()) {
                break;
            }
            current = paths::parent(current);
        }
    }

    fn add_file(&mut self, path: String, size: Option<u64>) {
        self.files.entry(path).or_insert(size);
    }

    fn into_entries(self) -> Vec<ArchiveEntry> {
        let mut out = Vec::with_capacity(self.dirs.len() + self.files.len());
        for path in self.dirs {
            out.push(ArchiveEntry {
                path,
                is_dir: true,
                size: None,
            });
        }
        for (path, size) in self.files {
            out.push(ArchiveEntry {
                path,
                is_dir: false,
                size,
            });
        }
        out
    }
}

/// Virtual prefix a nested archive's contents land under: the archive's
/// own path with the `.zip` extension dropped.
fn nested_prefix(full_path: &str) -> String {
    let stem = paths::strip_zip_all_segments(paths::leaf(full_path));
    paths::join(paths::parent(full_path), &stem)
}

/// Flatten `bytes` into a list of entries: all implicit parent directories
/// synthesized, directories before files, each sorted by path.
///
/// A corrupt top-level archive is fatal; a nested `.zip` that fails to open
/// stays in the listing as an ordinary opaque file.
pub fn collect_entries(bytes: &[u8]) -> CoreResult<Vec<ArchiveEntry>> {
    let mut set = EntrySet::default();
    collect_meta_level(bytes, "", 0, &mut set)?;
    Ok(set.into_entries())
}

/// Flatten a nested archive found outside a zip context (e.g. on disk) under
/// the given virtual prefix. Same rules as [`collect_entries`].
pub(crate) fn collect_entries_under(bytes: &[u8], prefix: &str) -> CoreResult<Vec<ArchiveEntry>> {
    let mut set = EntrySet::default();
    set.ensure_dir(prefix);
    collect_meta_level(bytes, prefix, 1, &mut set)?;
    Ok(set.into_entries())
}

fn collect_meta_level(
    bytes: &[u8],
    prefix: &str,
    depth: usize,
    set: &mut EntrySet,
) -> CoreResult<()> {
    if depth > MAX_NESTED_ARCHIVE_DEPTH {
        return Err(CoreError::ArchiveTooDeep {
            limit: MAX_NESTED_ARCHIVE_DEPTH,
        });
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CoreError::ArchiveCorrupt(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| CoreError::ArchiveCorrupt(format!("failed to read entry {i}: {e}")))?;

        let clean = paths::normalize(entry.name());
        if clean.is_empty() {
            continue;
        }
        let full = paths::join(prefix, &clean);
        set.ensure_parents(&full);

        if entry.is_dir() {
            set.ensure_dir(&full);
            continue;
        }

        let size = entry.size();
        if paths::has_zip_suffix(paths::leaf(&full)) {
            let mut data = Vec::new();
            if let Err(e) = entry.read_to_end(&mut data) {
                log::warn!("Nested archive '{full}' is unreadable, keeping as file: {e}");
                set.add_file(full, Some(size));
                continue;
            }
            match try_open_nested(&data) {
                Ok(()) => {
                    let virtual_root = nested_prefix(&full);
                    set.ensure_dir(&virtual_root);
                    collect_meta_level(&data, &virtual_root, depth + 1, set)?;
                }
                Err(e) => {
                    log::warn!("Nested archive '{full}' failed to open, keeping as file: {e}");
                    set.add_file(full, Some(size));
                }
            }
        } else {
            set.add_file(full, Some(size));
        }
    }
    Ok(())
}

fn try_open_nested(data: &[u8]) -> Result<(), zip::result::ZipError> {
    zip::ZipArchive::new(Cursor::new(data)).map(|_| ())
}

/// Rebuild-side flattening: every file reachable through any nesting depth,
/// with its bytes. Directories are implicit; duplicate virtual paths keep
/// the first occurrence.
pub fn collect_virtual_files(bytes: &[u8]) -> CoreResult<Vec<VirtualFile>> {
    let mut files = Vec::new();
    let mut seen = BTreeSet::new();
    collect_data_level(bytes, "", 0, &mut files, &mut seen)?;
    Ok(files)
}

fn collect_data_level(
    bytes: &[u8],
    prefix: &str,
    depth: usize,
    files: &mut Vec<VirtualFile>,
    seen: &mut BTreeSet<String>,
) -> CoreResult<()> {
    if depth > MAX_NESTED_ARCHIVE_DEPTH {
        return Err(CoreError::ArchiveTooDeep {
            limit: MAX_NESTED_ARCHIVE_DEPTH,
        });
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CoreError::ArchiveCorrupt(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| CoreError::ArchiveCorrupt(format!("failed to read entry {i}: {e}")))?;
        if entry.is_dir() {
            continue;
        }

        let clean = paths::normalize(entry.name());
        if clean.is_empty() {
            continue;
        }
        let full = paths::join(prefix, &clean);

        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| CoreError::Io(format!("failed to read '{full}': {e}")))?;

        if paths::has_zip_suffix(paths::leaf(&full)) {
            match try_open_nested(&data) {
                Ok(()) => {
                    let virtual_root = nested_prefix(&full);
                    collect_data_level(&data, &virtual_root, depth + 1, files, seen)?;
                    continue;
                }
                Err(e) => {
                    log::warn!("Nested archive '{full}' failed to open, copying as file: {e}");
                }
            }
        }

        if seen.insert(full.clone()) {
            files.push(VirtualFile { path: full, data });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/collector_tests.rs"]
mod tests;
