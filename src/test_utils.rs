//! Shared fixtures for unit tests: an in-memory reader and the two template
//! shapes most matcher tests are written against.

use crate::services::archive::ArchiveReader;
use crate::types::entry::ArchiveEntry;
use crate::types::errors::CoreResult;
use crate::types::results::{MatchStatus, NodeMatch, Project, SubmissionGroup};
use crate::types::template::{NodeKind, Template, TemplateNode};
use async_trait::async_trait;
use std::io::{Cursor, Write};
use std::sync::Once;
use zip::write::SimpleFileOptions;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Reader over a fixed entry list, no archive involved.
pub struct MockReader {
    entries: Vec<ArchiveEntry>,
}

impl MockReader {
    pub fn new(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl ArchiveReader for MockReader {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn list_entries(&self) -> CoreResult<Vec<ArchiveEntry>> {
        Ok(self.entries.clone())
    }
}

pub fn dir_node(id: &str, name: &str, parent: Option<&str>, children: &[&str]) -> TemplateNode {
    TemplateNode {
        id: id.to_string(),
        name: name.to_string(),
        kind: NodeKind::Directory,
        path: name.to_string(),
        parent: parent.map(str::to_string),
        children: children.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn file_node(id: &str, name: &str, parent: &str) -> TemplateNode {
    TemplateNode {
        id: id.to_string(),
        name: name.to_string(),
        kind: NodeKind::File,
        path: name.to_string(),
        parent: Some(parent.to_string()),
        children: Vec::new(),
    }
}

pub fn template_of(name: &str, nodes: Vec<TemplateNode>, roots: &[&str]) -> Template {
    Template {
        id: format!("{}-test", name.to_lowercase()),
        name: name.to_string(),
        description: String::new(),
        nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        root_nodes: roots.iter().map(|r| r.to_string()).collect(),
    }
}

/// Minimal Gradle layout: settings and build scripts (Groovy or Kotlin DSL)
/// plus `src/main/<anything>`.
pub fn gradle_template() -> Template {
    template_of(
        "Gradle",
        vec![
            dir_node("root", "Root", None, &["settings", "build", "src"]),
            file_node("settings", "settings.gradle*", "root"),
            file_node("build", "build.gradle*", "root"),
            dir_node("src", "src", Some("root"), &["srcMain"]),
            dir_node("srcMain", "main", Some("src"), &["srcMainAny"]),
            dir_node("srcMainAny", "*", Some("srcMain"), &[]),
        ],
        &["root"],
    )
}

/// Build an in-memory zip from `(path, contents)` pairs.
pub fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
    zip_of_bytes(
        &files
            .iter()
            .map(|(p, c)| (*p, c.as_bytes()))
            .collect::<Vec<_>>(),
    )
}

pub fn zip_of_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, contents) in files {
        writer.start_file(*path, options).expect("start zip entry");
        writer.write_all(contents).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// File names inside a zip, directory entries excluded.
pub fn zip_file_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    let mut names = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i).expect("read zip entry");
        if !entry.is_dir() {
            names.push(entry.name().to_string());
        }
    }
    names.sort();
    names
}

pub fn found_match(id: &str, path: &str) -> NodeMatch {
    NodeMatch {
        template_node_id: id.to_string(),
        found_path: path.to_string(),
        score: 100,
        status: MatchStatus::Found,
    }
}

pub fn missing_match(id: &str) -> NodeMatch {
    NodeMatch {
        template_node_id: id.to_string(),
        found_path: String::new(),
        score: 0,
        status: MatchStatus::Missing,
    }
}

pub fn project_named(root_path: &str, new_path: &str, matches: Vec<NodeMatch>) -> Project {
    Project {
        root_path: root_path.to_string(),
        score: 100,
        matched_node_count: matches
            .iter()
            .filter(|m| m.status == MatchStatus::Found)
            .count(),
        total_node_count: matches.len(),
        matches,
        suggested_new_path: new_path.to_string(),
        new_path: new_path.to_string(),
        is_renamed: false,
    }
}

pub fn single_group(name: &str, projects: Vec<Project>) -> SubmissionGroup {
    SubmissionGroup {
        name: name.to_string(),
        projects,
        expected_project_count: None,
    }
}

/// Minimal .NET layout: a solution file next to a project directory holding
/// the csproj and `Program.cs`.
pub fn dotnet_template() -> Template {
    template_of(
        ".NET",
        vec![
            dir_node("root", "Root", None, &["solution", "projectDir"]),
            file_node("solution", "*.sln", "root"),
            dir_node("projectDir", "*", Some("root"), &["csproj", "program"]),
            file_node("csproj", "*.csproj", "projectDir"),
            file_node("program", "Program.cs", "projectDir"),
        ],
        &["root"],
    )
}
