//! Template analysis: detect projects inside a submission archive and
//! group them per submitter.
//!
//! The archive root itself can form a group (name `""`) when a project sits
//! directly at the root; every top-level directory beneath the scan root is
//! another group. Within a group, the group
//! directory and each of its descendant directories are tried as candidate
//! project roots, and the ones whose similarity clears the threshold are
//! reported.

mod matcher;
mod pattern;

pub use matcher::{evaluate_candidate, CandidateEvaluation, EntryIndex};

use crate::services::archive::ArchiveReader;
use crate::services::paths;
use crate::types::errors::CoreResult;
use crate::types::results::{Project, SubmissionGroup};
use crate::types::template::Template;

pub struct AnalyzeParams<'a> {
    pub template: &'a Template,
    /// Directory inside the archive to scan beneath. Falls back to the
    /// archive root when the path does not exist in the archive.
    pub student_root_path: &'a str,
    /// Cap on reported projects per group; `None` keeps them all.
    pub projects_per_student: Option<usize>,
    /// Minimum similarity (0..=100) for a candidate to count as a project.
    pub similarity_threshold: u8,
}

/// Run template matching over every candidate root in the archive.
///
/// Groups come back sorted by name, projects within a group by descending
/// score then path, so repeated runs over the same input are identical.
pub async fn analyze(
    reader: &dyn ArchiveReader,
    params: AnalyzeParams<'_>,
) -> CoreResult<Vec<SubmissionGroup>> {
    params.template.validate()?;

    let entries = reader.list_entries().await?;
    log::info!(
        "Analyzing {} entries ({} reader) against template '{}'",
        entries.len(),
        reader.kind(),
        params.template.name
    );
    let index = EntryIndex::build(&entries);

    let mut scope = paths::normalize(params.student_root_path);
    if !scope.is_empty() && !index.has_entries_at_or_under(&scope) {
        log::info!("Scan root '{scope}' not found in archive, scanning from the root instead");
        scope.clear();
    }

    let mut groups = Vec::new();

    // Work submitted without a wrapping directory sits at the scan root.
    // That group only exists when the root itself passes as a project;
    // stray top-level files never create an empty "" group.
    let root_projects = collect_projects(&index, [scope.clone()], "", &params);
    if !root_projects.is_empty() {
        groups.push(SubmissionGroup {
            name: String::new(),
            projects: root_projects,
            expected_project_count: params.projects_per_student,
        });
    }

    for dir in index.child_dirs(&scope) {
        let name = paths::leaf(&dir).to_string();
        let mut candidates = vec![dir.clone()];
        candidates.extend(index.descendant_dirs(&dir));
        groups.push(SubmissionGroup {
            projects: collect_projects(&index, candidates, &name, &params),
            expected_project_count: params.projects_per_student,
            name,
        });
    }

    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

fn collect_projects(
    index: &EntryIndex,
    candidates: impl IntoIterator<Item = String>,
    group_name: &str,
    params: &AnalyzeParams<'_>,
) -> Vec<Project> {
    let mut projects = Vec::new();

    for root_path in candidates {
        let eval = evaluate_candidate(index, params.template, &root_path);
        let score = eval.score();
        if score < params.similarity_threshold {
            continue;
        }
        let suggested = suggest_name(group_name, &root_path);
        projects.push(Project {
            root_path,
            score,
            matched_node_count: eval.matched,
            total_node_count: eval.total,
            matches: eval.matches,
            new_path: suggested.clone(),
            suggested_new_path: suggested,
            is_renamed: false,
        });
    }

    projects.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.root_path.cmp(&b.root_path))
    });
    if let Some(cap) = params.projects_per_student {
        projects.truncate(cap);
    }
    projects
}

/// `{group}_{rootLeaf}` with filesystem-hostile characters stripped. The
/// leaf is dropped when it repeats the group name, and `"project"` stands
/// in when both parts are empty.
fn suggest_name(group: &str, root_path: &str) -> String {
    let leaf = paths::leaf(root_path);
    let raw = if group.is_empty() && leaf.is_empty() {
        "project".to_string()
    } else if group.is_empty() {
        leaf.to_string()
    } else if leaf.is_empty() || leaf == group {
        group.to_string()
    } else {
        format!("{group}_{leaf}")
    };
    sanitize_filename::sanitize(raw)
}

#[cfg(test)]
#[path = "tests/analyze_tests.rs"]
mod tests;
