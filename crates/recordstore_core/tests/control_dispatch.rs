use recordstore_core::storage::activity_log::INITIAL_LINE;
use recordstore_core::{
    initialize_storage, ControlDispatcher, ControlErrorKind, ControlResponse, StorageConfig,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup() -> (TempDir, StorageConfig, ControlDispatcher) {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::rooted_at(dir.path());
    initialize_storage(&config).unwrap();
    let dispatcher = ControlDispatcher::from_config(&config);
    (dir, config, dispatcher)
}

fn dispatch(dispatcher: &ControlDispatcher, body: serde_json::Value) -> ControlResponse {
    dispatcher.dispatch(body.to_string().as_bytes())
}

fn error_kind(response: &ControlResponse) -> ControlErrorKind {
    match response {
        ControlResponse::Error { kind, .. } => *kind,
        other => panic!("expected error response, got {other:?}"),
    }
}

fn dir_entries(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn log_message_appends_lines_in_call_order() {
    let (_dir, config, dispatcher) = setup();

    let first = dispatch(
        &dispatcher,
        json!({"action": "log_message", "payload": {"message": "x"}}),
    );
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        json!({"status": "Message logged", "message": "x"})
    );
    dispatch(
        &dispatcher,
        json!({"action": "log_message", "payload": {"message": "y"}}),
    );

    let log = fs::read_to_string(&config.log_file).unwrap();
    assert_eq!(log, format!("{INITIAL_LINE}\nx\ny\n"));
}

#[test]
fn update_file_overwrites_under_workspace_root() {
    let (dir, _config, dispatcher) = setup();
    fs::write(dir.path().join("notes.txt"), "old contents that are longer").unwrap();

    let response = dispatch(
        &dispatcher,
        json!({
            "action": "update_file",
            "payload": {"filename": "notes.txt", "content": "new"}
        }),
    );

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "File updated successfully", "filename": "notes.txt"})
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        "new"
    );
}

#[test]
fn update_file_rejects_traversal() {
    let (dir, _config, dispatcher) = setup();
    let before = dir_entries(dir.path());

    let response = dispatch(
        &dispatcher,
        json!({
            "action": "update_file",
            "payload": {"filename": "../outside.txt", "content": "x"}
        }),
    );

    assert_eq!(error_kind(&response), ControlErrorKind::InvalidPath);
    assert_eq!(dir_entries(dir.path()), before);
}

#[test]
fn update_file_refuses_activity_log_and_database() {
    let (_dir, config, dispatcher) = setup();
    dispatch(
        &dispatcher,
        json!({"action": "log_message", "payload": {"message": "x"}}),
    );
    let db_before = fs::read(&config.db_path).unwrap();

    for filename in ["core_log.txt", "./core_log.txt", "core_system.db"] {
        let response = dispatch(
            &dispatcher,
            json!({
                "action": "update_file",
                "payload": {"filename": filename, "content": ""}
            }),
        );
        assert_eq!(error_kind(&response), ControlErrorKind::InvalidPath);
    }

    assert_eq!(
        fs::read_to_string(&config.log_file).unwrap(),
        format!("{INITIAL_LINE}\nx\n")
    );
    assert_eq!(fs::read(&config.db_path).unwrap(), db_before);
}

#[test]
fn update_file_without_parent_directory_reports_io_without_leaking_paths() {
    let (dir, _config, dispatcher) = setup();

    let response = dispatch(
        &dispatcher,
        json!({
            "action": "update_file",
            "payload": {"filename": "missing/child.txt", "content": "x"}
        }),
    );

    match &response {
        ControlResponse::Error { kind, detail, .. } => {
            assert_eq!(*kind, ControlErrorKind::Io);
            assert!(!detail.contains(dir.path().to_str().unwrap()));
        }
        other => panic!("expected error response, got {other:?}"),
    }
}

#[test]
fn execute_task_echoes_task_without_side_effects() {
    let (dir, config, dispatcher) = setup();
    let before = dir_entries(dir.path());
    let log_before = fs::read_to_string(&config.log_file).unwrap();

    let response = dispatch(
        &dispatcher,
        json!({"action": "execute_task", "payload": {"task": "rebuild-index"}}),
    );

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "Task executed", "task": "rebuild-index"})
    );
    assert_eq!(dir_entries(dir.path()), before);
    assert_eq!(fs::read_to_string(&config.log_file).unwrap(), log_before);
}

#[test]
fn execute_task_without_task_echoes_null() {
    let (_dir, _config, dispatcher) = setup();

    let response = dispatch(&dispatcher, json!({"action": "execute_task", "payload": {}}));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "Task executed", "task": null})
    );
}

#[test]
fn unknown_action_echoes_action_without_mutation() {
    let (dir, config, dispatcher) = setup();
    let before = dir_entries(dir.path());
    let log_before = fs::read_to_string(&config.log_file).unwrap();

    let response = dispatch(&dispatcher, json!({"action": "frobnicate", "payload": {}}));

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "Unknown action", "action": "frobnicate"})
    );
    assert_eq!(dir_entries(dir.path()), before);
    assert_eq!(fs::read_to_string(&config.log_file).unwrap(), log_before);
}

#[test]
fn missing_action_is_unknown_with_null_action() {
    let (_dir, _config, dispatcher) = setup();

    let response = dispatch(&dispatcher, json!({"payload": {"message": "x"}}));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "Unknown action", "action": null})
    );
}

#[test]
fn malformed_json_is_tagged_error() {
    let (_dir, _config, dispatcher) = setup();

    let response = dispatcher.dispatch(b"{\"action\": ");
    assert!(response.is_error());
    assert_eq!(response.status(), "Error");
    assert_eq!(error_kind(&response), ControlErrorKind::InvalidJson);
}

#[test]
fn non_object_body_is_invalid_request() {
    let (_dir, _config, dispatcher) = setup();

    let response = dispatch(&dispatcher, json!(["log_message"]));
    assert_eq!(error_kind(&response), ControlErrorKind::InvalidRequest);
}

#[test]
fn missing_payload_and_fields_are_reported() {
    let (_dir, config, dispatcher) = setup();
    let log_before = fs::read_to_string(&config.log_file).unwrap();

    let no_payload = dispatch(&dispatcher, json!({"action": "log_message"}));
    assert_eq!(error_kind(&no_payload), ControlErrorKind::MissingField);

    let no_message = dispatch(&dispatcher, json!({"action": "log_message", "payload": {}}));
    assert_eq!(error_kind(&no_message), ControlErrorKind::MissingField);

    let wrong_type = dispatch(
        &dispatcher,
        json!({"action": "log_message", "payload": {"message": 7}}),
    );
    assert_eq!(error_kind(&wrong_type), ControlErrorKind::InvalidField);

    let payload_not_object = dispatch(
        &dispatcher,
        json!({"action": "execute_task", "payload": "task"}),
    );
    assert_eq!(
        error_kind(&payload_not_object),
        ControlErrorKind::InvalidRequest
    );

    assert_eq!(fs::read_to_string(&config.log_file).unwrap(), log_before);
}
