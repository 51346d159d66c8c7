use super::*;

const CLEANUP_YAML: &str = r#"
name: Cleanup
version: "1"
operations:
  - id: op-1
    label: Remove build output
    kind: delete-file
    target: build
  - id: op-2
    label: Drop grading marker
    kind: create-file
    target: GRADED.txt
    content: ok
    overwrite: true
  - id: op-3
    label: Tag solution folders
    kind: if
    test:
      selector: file-search
      operator: exists
      pattern: "*.sln"
    then:
      - id: op-3a
        label: Suffix the folder
        kind: rename
        target: SignalR
        mode: suffix
        value: _checked
"#;

#[test]
fn parses_a_workflow_from_yaml() {
    let workflow = workflow_from_yaml(CLEANUP_YAML).expect("valid workflow");
    assert_eq!(workflow.name, "Cleanup");
    assert_eq!(workflow.version.as_deref(), Some("1"));
    assert_eq!(workflow.operations.len(), 3);

    let first = &workflow.operations[0];
    assert_eq!(first.id(), "op-1");
    assert!(first.enabled());
    assert!(!first.continue_on_error());
    assert!(matches!(
        first.details,
        OperationDetails::DeleteFile { required: false, .. }
    ));

    match &workflow.operations[2].details {
        OperationDetails::If {
            test,
            then,
            else_branch,
        } => {
            assert_eq!(test.selector, Some(ConditionSelector::FileSearch));
            assert_eq!(test.operator, Some(ConditionOperator::Exists));
            assert_eq!(then.len(), 1);
            assert!(matches!(
                then[0].details,
                OperationDetails::Rename { .. }
            ));
            assert!(else_branch.is_none());
        }
        other => panic!("expected an if operation, got {other:?}"),
    }
}

#[test]
fn yaml_round_trips_without_loss() {
    let workflow = workflow_from_yaml(CLEANUP_YAML).expect("valid workflow");
    let yaml = workflow_to_yaml(&workflow).expect("serialize");
    let reparsed = workflow_from_yaml(&yaml).expect("reparse");

    let a = serde_json::to_value(&workflow).expect("to json");
    let b = serde_json::to_value(&reparsed).expect("to json");
    assert_eq!(a, b);
}

#[test]
fn rejects_unknown_operation_kinds() {
    let yaml = r#"
name: Bad
version: null
operations:
  - id: op-1
    label: Mystery
    kind: frobnicate
    target: x
"#;
    let err = workflow_from_yaml(yaml).expect_err("unknown kind");
    assert!(matches!(err, crate::types::errors::CoreError::Engine(_)));
}

#[test]
fn log_entries_carry_rfc3339_timestamps() {
    let entry = ExecutionLogEntry::new("op-1", "Remove build output", ValidationLevel::Warning, "slow");
    assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    assert_eq!(entry.level_string(), "WARN");
}

#[test]
fn validation_messages_serialize_in_camel_case() {
    let message = ValidationMessage {
        operation_id: "op-1".to_string(),
        operation_label: None,
        level: ValidationLevel::Error,
        message: "target escapes the workspace".to_string(),
        details: None,
    };
    let json = serde_json::to_string(&message).expect("serialize");
    assert!(json.contains("\"operationId\":\"op-1\""));
    assert!(json.contains("\"level\":\"error\""));
    assert!(!json.contains("operationLabel"));
}
