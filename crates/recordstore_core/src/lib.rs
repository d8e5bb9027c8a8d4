//! Core domain logic for the record store service.
//! This crate owns persistence, filesystem effects and the control dispatcher;
//! the HTTP surface lives in `recordstore_server`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::StorageConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{NewRecord, Record, RecordId, RecordSummary};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::control_service::{ControlDispatcher, ControlErrorKind, ControlResponse};
pub use service::record_service::RecordService;
pub use storage::{
    initialize_storage, ActivityLog, ArchiveWriter, InitError, StorageError, StorageReport,
    StorageResult, WorkspaceFiles,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
