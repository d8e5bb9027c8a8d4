//! Generic action dispatcher behind the control endpoint.
//!
//! # Responsibility
//! - Parse a raw JSON body into `{action, payload}`.
//! - Run one of the hardcoded actions: `update_file`, `execute_task`,
//!   `log_message`.
//! - Convert every failure into a tagged `Error` response.
//!
//! # Invariants
//! - `dispatch` never panics and never returns `Err`; the caller always gets a
//!   `ControlResponse`.
//! - Error responses carry a kind and a message built here; raw error text
//!   from serde or the filesystem only goes to the diagnostic log.
//! - Unknown actions have no side effects.
//! - Nothing is rolled back: a failed write may leave partial content.

use crate::config::StorageConfig;
use crate::storage::{ActivityLog, StorageError, WorkspaceFiles};
use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::time::Instant;

pub const STATUS_FILE_UPDATED: &str = "File updated successfully";
pub const STATUS_TASK_EXECUTED: &str = "Task executed";
pub const STATUS_MESSAGE_LOGGED: &str = "Message logged";
pub const STATUS_UNKNOWN_ACTION: &str = "Unknown action";
pub const STATUS_ERROR: &str = "Error";

/// Classification of dispatcher failures exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlErrorKind {
    /// Body is not parseable JSON.
    InvalidJson,
    /// Body or payload has the wrong shape.
    InvalidRequest,
    MissingField,
    InvalidField,
    /// Filename was refused by path resolution.
    InvalidPath,
    Io,
    /// The dispatcher itself could not run to completion.
    Internal,
}

impl ControlErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::InvalidRequest => "invalid_request",
            Self::MissingField => "missing_field",
            Self::InvalidField => "invalid_field",
            Self::InvalidPath => "invalid_path",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

/// Response body of the control endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ControlResponse {
    FileUpdated {
        status: &'static str,
        filename: String,
    },
    TaskExecuted {
        status: &'static str,
        task: Value,
    },
    MessageLogged {
        status: &'static str,
        message: String,
    },
    UnknownAction {
        status: &'static str,
        action: Value,
    },
    Error {
        status: &'static str,
        kind: ControlErrorKind,
        detail: String,
    },
}

impl ControlResponse {
    pub fn status(&self) -> &'static str {
        match self {
            Self::FileUpdated { status, .. }
            | Self::TaskExecuted { status, .. }
            | Self::MessageLogged { status, .. }
            | Self::UnknownAction { status, .. }
            | Self::Error { status, .. } => status,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    fn file_updated(filename: &str) -> Self {
        Self::FileUpdated {
            status: STATUS_FILE_UPDATED,
            filename: filename.to_string(),
        }
    }

    fn task_executed(task: Value) -> Self {
        Self::TaskExecuted {
            status: STATUS_TASK_EXECUTED,
            task,
        }
    }

    fn message_logged(message: &str) -> Self {
        Self::MessageLogged {
            status: STATUS_MESSAGE_LOGGED,
            message: message.to_string(),
        }
    }

    fn unknown_action(action: Value) -> Self {
        Self::UnknownAction {
            status: STATUS_UNKNOWN_ACTION,
            action,
        }
    }

    /// Error response for failures outside the dispatcher's own handling.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::Error {
            status: STATUS_ERROR,
            kind: ControlErrorKind::Internal,
            detail: detail.into(),
        }
    }
}

impl From<ControlError> for ControlResponse {
    fn from(err: ControlError) -> Self {
        Self::Error {
            status: STATUS_ERROR,
            kind: err.kind,
            detail: err.detail,
        }
    }
}

/// Internal failure carrying a caller-safe detail and the raw cause.
#[derive(Debug)]
struct ControlError {
    kind: ControlErrorKind,
    detail: String,
    cause: Option<String>,
}

impl ControlError {
    fn new(kind: ControlErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            cause: None,
        }
    }

    fn caused_by(mut self, cause: impl Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl From<StorageError> for ControlError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::InvalidPath { reason, .. } => {
                Self::new(ControlErrorKind::InvalidPath, format!("invalid filename: {reason}"))
            }
            io @ StorageError::Io { .. } => {
                Self::new(ControlErrorKind::Io, "filesystem operation failed").caused_by(io)
            }
        }
    }
}

type ControlResult<T> = Result<T, ControlError>;

/// Dispatcher for `{action, payload}` control requests.
#[derive(Debug, Clone)]
pub struct ControlDispatcher {
    workspace: WorkspaceFiles,
    activity_log: ActivityLog,
}

impl ControlDispatcher {
    pub fn new(workspace: WorkspaceFiles, activity_log: ActivityLog) -> Self {
        Self {
            workspace,
            activity_log,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        let workspace = WorkspaceFiles::new(&config.workspace_dir)
            .reserving(&config.db_path)
            .reserving(&config.log_file);
        Self::new(workspace, ActivityLog::new(&config.log_file))
    }

    /// Handles one raw request body.
    ///
    /// # Side effects
    /// - `update_file` writes under the workspace root.
    /// - `log_message` appends one line to the activity log.
    /// - Emits one `control_dispatch` logging event.
    pub fn dispatch(&self, body: &[u8]) -> ControlResponse {
        let started_at = Instant::now();

        match self.try_dispatch(body) {
            Ok((action, response)) => {
                info!(
                    "event=control_dispatch module=control status=ok action={} result={} duration_ms={}",
                    action,
                    response.status(),
                    started_at.elapsed().as_millis()
                );
                response
            }
            Err(err) => {
                warn!(
                    "event=control_dispatch module=control status=error kind={} detail={} cause={} duration_ms={}",
                    err.kind.as_str(),
                    err.detail,
                    err.cause.as_deref().unwrap_or("none"),
                    started_at.elapsed().as_millis()
                );
                err.into()
            }
        }
    }

    fn try_dispatch(&self, body: &[u8]) -> ControlResult<(&'static str, ControlResponse)> {
        let request: Value = serde_json::from_slice(body).map_err(|err| {
            ControlError::new(ControlErrorKind::InvalidJson, "request body is not valid JSON")
                .caused_by(err)
        })?;
        let Value::Object(mut fields) = request else {
            return Err(ControlError::new(
                ControlErrorKind::InvalidRequest,
                "request body must be a JSON object",
            ));
        };

        let action = fields.remove("action").unwrap_or(Value::Null);
        let payload = fields.remove("payload");
        let action_name = action.as_str().map(str::to_owned);

        match action_name.as_deref() {
            Some("update_file") => {
                let payload = require_payload(payload)?;
                let filename = require_str(&payload, "filename")?;
                let content = require_str(&payload, "content")?;
                self.workspace.overwrite(filename, content)?;
                Ok(("update_file", ControlResponse::file_updated(filename)))
            }
            Some("execute_task") => {
                let mut payload = require_payload(payload)?;
                let task = payload.remove("task").unwrap_or(Value::Null);
                Ok(("execute_task", ControlResponse::task_executed(task)))
            }
            Some("log_message") => {
                let payload = require_payload(payload)?;
                let message = require_str(&payload, "message")?;
                self.activity_log.append_line(message)?;
                Ok(("log_message", ControlResponse::message_logged(message)))
            }
            _ => Ok(("unknown", ControlResponse::unknown_action(action))),
        }
    }
}

fn require_payload(payload: Option<Value>) -> ControlResult<Map<String, Value>> {
    match payload {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ControlError::new(
            ControlErrorKind::InvalidRequest,
            "`payload` must be a JSON object",
        )),
        None => Err(ControlError::new(
            ControlErrorKind::MissingField,
            "missing field `payload`",
        )),
    }
}

fn require_str<'a>(payload: &'a Map<String, Value>, field: &str) -> ControlResult<&'a str> {
    match payload.get(field) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(_) => Err(ControlError::new(
            ControlErrorKind::InvalidField,
            format!("payload field `{field}` must be a string"),
        )),
        None => Err(ControlError::new(
            ControlErrorKind::MissingField,
            format!("missing payload field `{field}`"),
        )),
    }
}
