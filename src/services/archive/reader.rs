//! Input abstraction over "something that can list archive entries".
//!
//! The matcher only ever consumes [`ArchiveReader`], so the same analysis
//! runs against an in-memory archive, an already-extracted directory, or a
//! mock entry list in tests.

use crate::services::archive::collector;
use crate::services::paths;
use crate::types::entry::ArchiveEntry;
use crate::types::errors::CoreResult;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[async_trait]
pub trait ArchiveReader: Send + Sync {
    /// Identifier used in logs (e.g. `"zip"`, `"dir"`).
    fn kind(&self) -> &'static str;

    /// Flattened virtual entries, directories first, each sorted by path.
    async fn list_entries(&self) -> CoreResult<Vec<ArchiveEntry>>;
}

/// Reader over an in-memory archive.
pub struct ZipReader {
    bytes: Vec<u8>,
}

impl ZipReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl ArchiveReader for ZipReader {
    fn kind(&self) -> &'static str {
        "zip"
    }

    async fn list_entries(&self) -> CoreResult<Vec<ArchiveEntry>> {
        collector::collect_entries(&self.bytes)
    }
}

/// Reader over a directory on disk, for submissions that arrive already
/// extracted. Nested `.zip` files are still flattened virtually.
pub struct DirReader {
    root: PathBuf,
}

impl DirReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let joined = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let normalized = paths::normalize(&joined);
        (!normalized.is_empty()).then_some(normalized)
    }
}

#[async_trait]
impl ArchiveReader for DirReader {
    fn kind(&self) -> &'static str {
        "dir"
    }

    async fn list_entries(&self) -> CoreResult<Vec<ArchiveEntry>> {
        let mut dirs: BTreeSet<String> = BTreeSet::new();
        let mut files: BTreeMap<String, Option<u64>> = BTreeMap::new();

        let walker = WalkDir::new(&self.root).follow_links(false).into_iter();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            let rel = match self.relative_path(entry.path()) {
                Some(r) => r,
                None => continue,
            };

            if entry.file_type().is_dir() {
                dirs.insert(rel);
                continue;
            }

            if paths::has_zip_suffix(paths::leaf(&rel)) {
                match expand_zip_file(entry.path(), &rel) {
                    Ok(nested) => {
                        for e in nested {
                            if e.is_dir {
                                dirs.insert(e.path);
                            } else {
                                files.entry(e.path).or_insert(e.size);
                            }
                        }
                        continue;
                    }
                    Err(e) => {
                        log::warn!("Archive '{rel}' failed to open, keeping as file: {e}");
                    }
                }
            }

            let size = entry.metadata().ok().map(|m| m.len());
            files.entry(rel).or_insert(size);
        }

        let mut out = Vec::with_capacity(dirs.len() + files.len());
        for path in dirs {
            out.push(ArchiveEntry::dir(path));
        }
        for (path, size) in files {
            out.push(ArchiveEntry {
                path,
                is_dir: false,
                size,
            });
        }
        Ok(out)
    }
}

fn expand_zip_file(path: &Path, rel: &str) -> CoreResult<Vec<ArchiveEntry>> {
    let bytes = std::fs::read(path)?;
    let prefix = paths::join(
        paths::parent(rel),
        &paths::strip_zip_all_segments(paths::leaf(rel)),
    );
    collector::collect_entries_under(&bytes, &prefix)
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
