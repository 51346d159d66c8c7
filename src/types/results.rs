//! Analysis result model. Each `analyze` call produces a fresh snapshot;
//! only [`Project::new_path`] is ever edited afterward (by the user, via
//! [`Project::rename`]) and edits never mutate a previous call's result.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Found,
    Missing,
    /// Reserved for fractional scoring; never produced by current matching.
    Partial,
}

/// Outcome for one template node against a candidate project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMatch {
    pub template_node_id: String,
    /// Full entry path the node matched at, empty when missing.
    pub found_path: String,
    /// 0 or 100; fractional values are a reserved extension point.
    pub score: u8,
    pub status: MatchStatus,
}

/// One detected project inside a submission group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Nominal root recorded at analysis time. Rebuild recomputes the
    /// effective root from the node matches.
    pub root_path: String,
    pub score: u8,
    pub matched_node_count: usize,
    pub total_node_count: usize,
    pub matches: Vec<NodeMatch>,
    /// Proposed output name, `{group}_{rootLeaf}` sanitized.
    pub suggested_new_path: String,
    /// Output name actually used at rebuild time. Blank means "skip".
    pub new_path: String,
    #[serde(default)]
    pub is_renamed: bool,
}

impl Project {
    /// Apply a user edit to the output name.
    pub fn rename(&mut self, new_path: impl Into<String>) {
        self.new_path = new_path.into();
        self.is_renamed = self.new_path != self.suggested_new_path;
    }
}

/// All projects detected under one top-level submitter directory, or under
/// the scan root itself (`name` is `""` in that case).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionGroup {
    pub name: String,
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_project_count: Option<usize>,
}
