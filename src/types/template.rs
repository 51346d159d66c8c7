//! Expected-tree template, authored by an external editor and treated as
//! read-only input here.
//!
//! Nodes live in a flat id-keyed map with parent/children id references.
//! Keep it that way: the arena shape avoids cyclic ownership and lets the
//! editor address nodes by handle.

use crate::types::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One file or directory in the expected tree.
///
/// `name` is a name pattern: a literal, or a single `*` splitting the
/// segment into a required prefix and suffix (`*` alone matches any one
/// segment, `settings.gradle*` matches `settings.gradle.kts`, `*.sln`
/// matches `MyApp.sln`). Any other glyph is literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Parent path joined with this node's name; maintained by the editor.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub nodes: HashMap<String, TemplateNode>,
    pub root_nodes: Vec<String>,
}

impl Template {
    pub fn node(&self, id: &str) -> Option<&TemplateNode> {
        self.nodes.get(id)
    }

    /// Structural validation, run before any entry scanning.
    pub fn validate(&self) -> CoreResult<()> {
        if self.root_nodes.is_empty() {
            return Err(CoreError::TemplateInvalid(
                "template has no root nodes".to_string(),
            ));
        }
        for root_id in &self.root_nodes {
            if !self.nodes.contains_key(root_id) {
                return Err(CoreError::TemplateInvalid(format!(
                    "root node '{root_id}' does not resolve"
                )));
            }
        }
        for node in self.nodes.values() {
            if let Some(parent_id) = &node.parent {
                let parent = self.nodes.get(parent_id).ok_or_else(|| {
                    CoreError::TemplateInvalid(format!(
                        "node '{}' references missing parent '{parent_id}'",
                        node.id
                    ))
                })?;
                if parent.kind != NodeKind::Directory {
                    return Err(CoreError::TemplateInvalid(format!(
                        "parent '{parent_id}' of node '{}' is not a directory",
                        node.id
                    )));
                }
            }
            for child_id in &node.children {
                if !self.nodes.contains_key(child_id) {
                    return Err(CoreError::TemplateInvalid(format!(
                        "node '{}' references missing child '{child_id}'",
                        node.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/template_tests.rs"]
mod tests;
