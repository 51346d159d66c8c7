//! Exchange types for the remote workflow engine.
//!
//! Workflows are authored externally (usually as YAML) and run against a
//! workspace holding the repackaged archives; this crate only ships them
//! back and forth.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_enabled() -> bool {
    true
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub name: String,
    pub version: Option<String>,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OperationMeta {
    pub id: String,
    pub label: String,
    pub comment: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub continue_on_error: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(flatten)]
    pub meta: OperationMeta,
    #[serde(flatten)]
    pub details: OperationDetails,
}

impl Operation {
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn label(&self) -> &str {
        &self.meta.label
    }

    pub fn enabled(&self) -> bool {
        self.meta.enabled
    }

    pub fn continue_on_error(&self) -> bool {
        self.meta.continue_on_error
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OperationDetails {
    #[serde(rename_all = "camelCase")]
    CreateFile {
        target: String,
        #[serde(default)]
        overwrite: bool,
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    DeleteFile {
        target: String,
        #[serde(default)]
        required: bool,
    },
    #[serde(rename_all = "camelCase")]
    Copy {
        source: String,
        destination: String,
        #[serde(default)]
        overwrite: bool,
    },
    #[serde(rename_all = "camelCase")]
    Move {
        source: String,
        destination: String,
        #[serde(default)]
        overwrite: bool,
    },
    #[serde(rename_all = "camelCase")]
    Rename {
        target: String,
        mode: RenameMode,
        value: String,
        search: Option<String>,
        replace: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Mkdir {
        target: String,
        #[serde(default = "default_true")]
        recursive: bool,
        #[serde(default = "default_true")]
        skip_if_exists: bool,
    },
    #[serde(rename_all = "camelCase")]
    ReplaceInFile {
        target: String,
        search: String,
        replace: String,
        mode: ReplaceMode,
        flags: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Exec {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        shell: ShellKind,
        cwd: Option<String>,
        env: Option<HashMap<String, String>>,
    },
    #[serde(rename_all = "camelCase")]
    If {
        test: ConditionTest,
        #[serde(default)]
        then: Vec<Operation>,
        #[serde(rename = "else")]
        else_branch: Option<Vec<Operation>>,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "snake_case")]
pub enum ShellKind {
    Default,
    Powershell,
    Bash,
    Zsh,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum ReplaceMode {
    Plain,
    Regex,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum RenameMode {
    Suffix,
    Prefix,
    ChangeExtension,
    Replace,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionSelector {
    CurrentFolderName,
    FileSearch,
    FileCount,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    Regex,
    Exists,
    NotExists,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionScope {
    CurrentFolder,
    Recursive,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConditionTest {
    pub selector: Option<ConditionSelector>,
    pub operator: Option<ConditionOperator>,
    pub value: Option<String>,
    pub pattern: Option<String>,
    pub scope: Option<ConditionScope>,
    #[serde(default)]
    pub negate: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    pub operation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_label: Option<String>,
    pub level: ValidationLevel,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogEntry {
    pub timestamp: String,
    pub operation_id: String,
    pub operation_label: String,
    pub message: String,
    pub level: ValidationLevel,
}

impl ExecutionLogEntry {
    pub fn new(
        operation_id: impl Into<String>,
        operation_label: impl Into<String>,
        level: ValidationLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            operation_id: operation_id.into(),
            operation_label: operation_label.into(),
            message: message.into(),
            level,
        }
    }

    pub fn level_string(&self) -> &'static str {
        match self.level {
            ValidationLevel::Info => "INFO",
            ValidationLevel::Warning => "WARN",
            ValidationLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub operations_run: usize,
    pub log_entries: Vec<ExecutionLogEntry>,
    pub warnings: Vec<ValidationMessage>,
    pub errors: Vec<ValidationMessage>,
    pub output_archive_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub enum WorkspaceMode {
    Zip,
    Directory,
}

/// What the engine reports after ingesting an archive or directory.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub workspace_id: String,
    pub mode: WorkspaceMode,
    pub source_path: String,
    pub sub_folders: Vec<String>,
}
