//! Two-pass rebuild: plan every copy up front, then write the output
//! archive with progress reporting and cooperative cancellation.

mod root_resolver;

pub use root_resolver::resolve_effective_root;

use crate::services::archive::{collect_virtual_files, VirtualFile};
use crate::services::paths;
use crate::types::errors::{CoreError, CoreResult};
use crate::types::results::SubmissionGroup;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Progress callbacks fire at most once per this many copied files, plus
/// once per finished project and once at completion.
pub const PROGRESS_EVERY_FILES: usize = 5;

const DEFAULT_OUTPUT_NAME: &str = "standardized.zip";

/// Shared cancellation flag, polled before each project and each file copy.
#[derive(Clone, Default)]
pub struct RebuildState {
    cancelled: Arc<AtomicBool>,
}

impl RebuildState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RebuildOptions {
    /// File name reported back for the produced archive.
    pub output_name: Option<String>,
}

#[derive(Debug)]
pub struct RebuildOutcome {
    pub output_name: String,
    pub files_copied: usize,
    pub archive: Vec<u8>,
}

/// `(ratio, destination path)`; the path is absent for the per-project and
/// final completion ticks.
pub type ProgressFn<'a> = dyn Fn(f64, Option<&str>) + Send + Sync + 'a;

struct ProjectPlan {
    pairs: Vec<(usize, String)>,
}

/// Copy every selected project of `groups` out of `source` into a fresh
/// archive under its `new_path`.
///
/// Blank `new_path` skips the project; cancellation aborts the whole call
/// with [`CoreError::Cancelled`] and no partial archive.
pub async fn rebuild(
    source: &[u8],
    groups: &[SubmissionGroup],
    options: RebuildOptions,
    on_progress: Option<&ProgressFn<'_>>,
    state: &RebuildState,
) -> CoreResult<RebuildOutcome> {
    let files = collect_virtual_files(source)?;
    log::info!(
        "Rebuilding from {} virtual files across {} groups",
        files.len(),
        groups.len()
    );

    let plans = plan_projects(&files, groups, state)?;
    let total = plans
        .iter()
        .map(|p| p.pairs.len())
        .sum::<usize>()
        .max(1);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let zip_options = SimpleFileOptions::default();
    let mut written: BTreeSet<&str> = BTreeSet::new();
    let mut done = 0usize;

    for plan in &plans {
        if state.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        for (file_idx, dest) in &plan.pairs {
            if state.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            if !written.insert(dest) {
                log::warn!("Skipping duplicate output path '{dest}'");
                continue;
            }
            writer
                .start_file(dest, zip_options)
                .map_err(|e| CoreError::Io(format!("failed to add '{dest}': {e}")))?;
            writer
                .write_all(&files[*file_idx].data)
                .map_err(|e| CoreError::Io(format!("failed to write '{dest}': {e}")))?;
            done += 1;
            if done % PROGRESS_EVERY_FILES == 0 {
                if let Some(progress) = on_progress {
                    progress(done as f64 / total as f64, Some(dest));
                }
            }
        }
        if let Some(progress) = on_progress {
            progress(done as f64 / total as f64, None);
        }
    }

    if let Some(progress) = on_progress {
        progress(1.0, None);
    }

    let archive = writer
        .finish()
        .map_err(|e| CoreError::Io(format!("failed to finalize archive: {e}")))?
        .into_inner();

    Ok(RebuildOutcome {
        output_name: options
            .output_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
        files_copied: done,
        archive,
    })
}

/// Planning pass: resolve each selected project's effective root and list
/// its copies as `(file index, destination)` pairs. Roots are resolved once
/// per nominal root path, in an explicit map.
fn plan_projects(
    files: &[VirtualFile],
    groups: &[SubmissionGroup],
    state: &RebuildState,
) -> CoreResult<Vec<ProjectPlan>> {
    let mut resolved_roots: BTreeMap<String, String> = BTreeMap::new();
    let mut plans = Vec::new();

    for group in groups {
        for project in &group.projects {
            if state.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            let dst_root = project.new_path.trim();
            if dst_root.is_empty() {
                log::debug!("Skipping project '{}': blank output name", project.root_path);
                continue;
            }

            let root = resolved_roots
                .entry(project.root_path.clone())
                .or_insert_with(|| resolve_effective_root(project, files))
                .clone();

            let mut pairs = Vec::new();
            for (idx, vf) in files.iter().enumerate() {
                if !paths::is_at_or_under(&vf.path, &root) {
                    continue;
                }
                let dest = if vf.path == root {
                    dst_root.to_string()
                } else if root.is_empty() {
                    paths::join(dst_root, &vf.path)
                } else {
                    paths::join(dst_root, &vf.path[root.len() + 1..])
                };
                pairs.push((idx, dest));
            }
            if pairs.is_empty() {
                log::warn!(
                    "Project '{}' resolved to root '{root}' with no files, skipping",
                    project.root_path
                );
                continue;
            }
            plans.push(ProjectPlan { pairs });
        }
    }

    Ok(plans)
}

#[cfg(test)]
#[path = "tests/rebuilder_tests.rs"]
mod tests;
