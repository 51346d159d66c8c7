//! Client side of the remote workflow engine.
//!
//! After a rebuild, the produced archive can be handed to an external
//! automation engine that runs a per-folder workflow (cleanup, renames,
//! grading scripts). This module carries the exchange types, the YAML
//! form workflows are authored in, and an HTTP client for the engine.

pub mod types;

pub use types::{
    ConditionOperator, ConditionScope, ConditionSelector, ConditionTest, ExecutionLogEntry,
    ExecutionResult, Operation, OperationDetails, OperationMeta, RenameMode, ReplaceMode,
    ShellKind, ValidationLevel, ValidationMessage, Workflow, WorkspaceMode, WorkspaceSummary,
};

use crate::types::errors::{CoreError, CoreResult};
use reqwest::blocking::Client;
use serde::Serialize;

pub fn workflow_from_yaml(yaml: &str) -> CoreResult<Workflow> {
    serde_yaml::from_str(yaml).map_err(|e| CoreError::Engine(format!("invalid workflow: {e}")))
}

pub fn workflow_to_yaml(workflow: &Workflow) -> CoreResult<String> {
    serde_yaml::to_string(workflow)
        .map_err(|e| CoreError::Engine(format!("failed to serialize workflow: {e}")))
}

/// Engine operations this crate consumes. Implementations are expected to
/// be remote; [`HttpWorkflowEngine`] is the standard one.
pub trait WorkflowEngine {
    fn prepare_workspace(&self, path: &str) -> CoreResult<WorkspaceSummary>;

    fn validate_workflow(
        &self,
        workspace_id: &str,
        workflow: &Workflow,
    ) -> CoreResult<Vec<ValidationMessage>>;

    fn execute_workflow(
        &self,
        workspace_id: &str,
        workflow: &Workflow,
    ) -> CoreResult<ExecutionResult>;
}

pub struct HttpWorkflowEngine {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct PrepareRequest<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WorkflowRequest<'a> {
    workflow: &'a Workflow,
}

impl HttpWorkflowEngine {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &impl Serialize,
    ) -> CoreResult<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payload);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let res = request
            .send()
            .map_err(|e| CoreError::Engine(format!("HTTP request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().unwrap_or_default();
            return Err(CoreError::Engine(format!("engine error {status}: {text}")));
        }

        res.json()
            .map_err(|e| CoreError::Engine(format!("failed to parse engine response: {e}")))
    }
}

impl WorkflowEngine for HttpWorkflowEngine {
    fn prepare_workspace(&self, path: &str) -> CoreResult<WorkspaceSummary> {
        self.post("workspaces", &PrepareRequest { path })
    }

    fn validate_workflow(
        &self,
        workspace_id: &str,
        workflow: &Workflow,
    ) -> CoreResult<Vec<ValidationMessage>> {
        self.post(
            &format!("workspaces/{workspace_id}/validate"),
            &WorkflowRequest { workflow },
        )
    }

    fn execute_workflow(
        &self,
        workspace_id: &str,
        workflow: &Workflow,
    ) -> CoreResult<ExecutionResult> {
        self.post(
            &format!("workspaces/{workspace_id}/execute"),
            &WorkflowRequest { workflow },
        )
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
