//! Scores candidate project roots against the template tree.

use crate::services::analyzer::pattern;
use crate::services::paths;
use crate::types::entry::ArchiveEntry;
use crate::types::results::{MatchStatus, NodeMatch};
use crate::types::template::{NodeKind, Template, TemplateNode};
use std::collections::{BTreeMap, BTreeSet};

/// Parent/child index over a flattened entry list.
///
/// Directories implied by file paths are synthesized here, so readers that
/// omit explicit directory entries still index correctly.
pub struct EntryIndex {
    children: BTreeMap<String, BTreeSet<String>>,
    dirs: BTreeSet<String>,
    files: BTreeSet<String>,
}

impl EntryIndex {
    pub fn build(entries: &[ArchiveEntry]) -> Self {
        let mut dirs: BTreeSet<String> = BTreeSet::new();
        let mut files: BTreeSet<String> = BTreeSet::new();

        for entry in entries {
            let path = paths::normalize(&entry.path);
            if path.is_empty() {
                continue;
            }
            let mut ancestor = paths::parent(&path).to_string();
            while !ancestor.is_empty() && dirs.insert(ancestor.clone()) {
                ancestor = paths::parent(&ancestor).to_string();
            }
            if entry.is_dir {
                dirs.insert(path);
            } else {
                files.insert(path);
            }
        }

        let mut children: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        children.entry(String::new()).or_default();
        for dir in &dirs {
            children.entry(dir.clone()).or_default();
            children
                .entry(paths::parent(dir).to_string())
                .or_default()
                .insert(dir.clone());
        }
        for file in &files {
            children
                .entry(paths::parent(file).to_string())
                .or_default()
                .insert(file.clone());
        }

        Self {
            children,
            dirs,
            files,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.dirs.contains(path)
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Direct child directories of `dir`, sorted.
    pub fn child_dirs(&self, dir: &str) -> Vec<String> {
        self.children
            .get(dir)
            .map(|set| {
                set.iter()
                    .filter(|p| self.dirs.contains(*p))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every directory strictly beneath `root`, sorted.
    pub fn descendant_dirs(&self, root: &str) -> Vec<String> {
        self.dirs
            .iter()
            .filter(|d| paths::is_under(d, root))
            .cloned()
            .collect()
    }

    /// Whether any entry lies at or beneath `path`.
    pub fn has_entries_at_or_under(&self, path: &str) -> bool {
        self.dirs.iter().any(|d| paths::is_at_or_under(d, path))
            || self.files.iter().any(|f| paths::is_at_or_under(f, path))
    }

    /// Direct children of `base` whose kind matches and whose name
    /// satisfies the node's pattern, sorted.
    fn matching_children(&self, base: &str, name_pattern: &str, kind: NodeKind) -> Vec<String> {
        let Some(children) = self.children.get(base) else {
            return Vec::new();
        };
        children
            .iter()
            .filter(|path| match kind {
                NodeKind::Directory => self.dirs.contains(*path),
                NodeKind::File => self.files.contains(*path),
            })
            .filter(|path| pattern::segment_matches(name_pattern, paths::leaf(path)))
            .cloned()
            .collect()
    }
}

/// Result of evaluating one candidate root against the template.
pub struct CandidateEvaluation {
    pub matches: Vec<NodeMatch>,
    pub matched: usize,
    pub total: usize,
}

impl CandidateEvaluation {
    /// Overall similarity, 0..=100.
    pub fn score(&self) -> u8 {
        let total = self.total.max(1);
        ((self.matched as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Evaluate the template against one candidate project root.
///
/// Template roots are placeholders for the candidate root itself; their
/// descendants are what gets matched.
pub fn evaluate_candidate(
    index: &EntryIndex,
    template: &Template,
    root_path: &str,
) -> CandidateEvaluation {
    let mut matches = Vec::new();
    let mut matched = 0;
    let mut total = 0;

    for root_id in &template.root_nodes {
        let Some(root) = template.node(root_id) else {
            continue;
        };
        total += count_descendants(template, &root.children);
        matched += eval_nodes(index, template, &root.children, root_path, &mut matches);
    }

    CandidateEvaluation {
        matches,
        matched,
        total,
    }
}

fn count_descendants(template: &Template, node_ids: &[String]) -> usize {
    let mut count = 0;
    for id in node_ids {
        if let Some(node) = template.node(id) {
            count += 1 + count_descendants(template, &node.children);
        }
    }
    count
}

/// Match `node_ids` against the children of `base`, parent-first. Returns
/// the number of nodes found in this subtree.
fn eval_nodes(
    index: &EntryIndex,
    template: &Template,
    node_ids: &[String],
    base: &str,
    out: &mut Vec<NodeMatch>,
) -> usize {
    let mut found = 0;

    for id in node_ids {
        let Some(node) = template.node(id) else {
            continue;
        };
        let candidates = index.matching_children(base, &node.name, node.kind);

        #[cfg(feature = "debug_matcher")]
        log::debug!(
            "node '{}' ({:?} '{}') under '{base}': {} candidate(s)",
            node.id,
            node.kind,
            node.name,
            candidates.len()
        );

        match node.kind {
            NodeKind::File => {
                if let Some(path) = candidates.first() {
                    out.push(found_match(node, path.clone()));
                    found += 1;
                } else {
                    out.push(missing_match(node));
                }
            }
            NodeKind::Directory => {
                if candidates.is_empty() {
                    out.push(missing_match(node));
                    mark_subtree_missing(template, &node.children, out);
                    continue;
                }
                // A wildcard directory may match several segments; commit
                // to whichever one lets the most of its subtree match.
                let mut best: Option<(usize, String, Vec<NodeMatch>)> = None;
                for candidate in candidates {
                    let mut sub = Vec::new();
                    let sub_found =
                        eval_nodes(index, template, &node.children, &candidate, &mut sub);
                    let better = match &best {
                        None => true,
                        Some((best_found, _, _)) => sub_found > *best_found,
                    };
                    if better {
                        best = Some((sub_found, candidate, sub));
                    }
                }
                if let Some((sub_found, chosen, sub)) = best {
                    out.push(found_match(node, chosen));
                    out.extend(sub);
                    found += 1 + sub_found;
                }
            }
        }
    }

    found
}

fn mark_subtree_missing(template: &Template, node_ids: &[String], out: &mut Vec<NodeMatch>) {
    for id in node_ids {
        if let Some(node) = template.node(id) {
            out.push(missing_match(node));
            mark_subtree_missing(template, &node.children, out);
        }
    }
}

fn found_match(node: &TemplateNode, path: String) -> NodeMatch {
    NodeMatch {
        template_node_id: node.id.clone(),
        found_path: path,
        score: 100,
        status: MatchStatus::Found,
    }
}

fn missing_match(node: &TemplateNode) -> NodeMatch {
    NodeMatch {
        template_node_id: node.id.clone(),
        found_path: String::new(),
        score: 0,
        status: MatchStatus::Missing,
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
