//! Record store HTTP routes.
//!
//! Endpoints for record CRUD, archive uploads, the rebuild stub and the
//! control dispatcher. Blocking SQLite and filesystem work runs on tokio's
//! blocking pool; each record request opens its own connection.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use log::error;
use serde::{Deserialize, Serialize};

use recordstore_core::db::open_db;
use recordstore_core::{
    core_version, ArchiveWriter, ControlDispatcher, ControlResponse, RecordId, RecordService,
    RepoResult, SqliteRecordRepository, StorageConfig,
};

use crate::errors::{ApiError, ApiResult};

pub const STATUS_FILE_ADDED: &str = "file added";
pub const STATUS_NO_FILES: &str = "no files";
pub const STATUS_FILE_DELETED: &str = "file deleted";
pub const STATUS_CORE_UPLOADED: &str = "core uploaded";
pub const STATUS_PROJECT_REBUILT: &str = "project rebuilt";

// ==================
// Shared State
// ==================

/// State shared across handlers
pub struct AppState {
    storage: StorageConfig,
    archive: ArchiveWriter,
    dispatcher: ControlDispatcher,
}

impl AppState {
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            archive: ArchiveWriter::new(&storage.archive_dir),
            dispatcher: ControlDispatcher::from_config(&storage),
            storage,
        }
    }

    /// Runs `f` against a record service backed by a fresh connection.
    async fn with_record_service<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&RecordService<SqliteRecordRepository<'_>>) -> RepoResult<T> + Send + 'static,
    {
        let db_path = self.storage.db_path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = open_db(&db_path)?;
            let service = RecordService::new(SqliteRecordRepository::new(&conn));
            f(&service)
        })
        .await?;
        Ok(result?)
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct FileBody {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AddFileResponse {
    pub status: &'static str,
    pub file: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListFilesResponse {
    Files { files: Vec<(RecordId, String)> },
    Empty { status: &'static str },
}

#[derive(Debug, Serialize)]
pub struct GetFileResponse {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteFileResponse {
    pub status: &'static str,
    pub file_id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct UploadCoreResponse {
    pub status: &'static str,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ==================
// Routes
// ==================

/// Create record store routes
pub fn record_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/add-file/", post(add_file_handler))
        .route("/list-files/", get(list_files_handler))
        .route("/get-file/:file_id/", get(get_file_handler))
        .route("/delete-file/:file_id/", delete(delete_file_handler))
        .route("/upload-core/", post(upload_core_handler))
        .route("/rebuild-project/", get(rebuild_project_handler))
        .route("/api-control/", post(api_control_handler))
        .with_state(state)
}

/// Liveness probe
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

// ==================
// Handlers
// ==================

async fn add_file_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FileBody>,
) -> ApiResult<Json<AddFileResponse>> {
    let FileBody { name, content } = body;
    let file = name.clone();
    state
        .with_record_service(move |service| service.add_file(name, content))
        .await?;

    Ok(Json(AddFileResponse {
        status: STATUS_FILE_ADDED,
        file,
    }))
}

async fn list_files_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListFilesResponse>> {
    let records = state
        .with_record_service(|service| service.list_files())
        .await?;

    if records.is_empty() {
        return Ok(Json(ListFilesResponse::Empty {
            status: STATUS_NO_FILES,
        }));
    }

    Ok(Json(ListFilesResponse::Files {
        files: records
            .into_iter()
            .map(|record| (record.id, record.name))
            .collect(),
    }))
}

async fn get_file_handler(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<RecordId>,
) -> ApiResult<Json<GetFileResponse>> {
    let record = state
        .with_record_service(move |service| service.get_file(file_id))
        .await?;

    Ok(Json(GetFileResponse {
        name: record.name,
        content: record.content,
    }))
}

async fn delete_file_handler(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<RecordId>,
) -> ApiResult<Json<DeleteFileResponse>> {
    state
        .with_record_service(move |service| service.delete_file(file_id))
        .await?;

    Ok(Json(DeleteFileResponse {
        status: STATUS_FILE_DELETED,
        file_id,
    }))
}

async fn upload_core_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FileBody>,
) -> ApiResult<Json<UploadCoreResponse>> {
    let archive = state.archive.clone();
    let path = tokio::task::spawn_blocking(move || archive.upload(&body.name, &body.content))
        .await?
        .map_err(ApiError::from)?;

    Ok(Json(UploadCoreResponse {
        status: STATUS_CORE_UPLOADED,
        path: path.display().to_string(),
    }))
}

async fn rebuild_project_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: STATUS_PROJECT_REBUILT,
    })
}

async fn api_control_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<ControlResponse> {
    let dispatcher = state.dispatcher.clone();
    let response = tokio::task::spawn_blocking(move || dispatcher.dispatch(&body))
        .await
        .unwrap_or_else(|err| {
            error!(
                "event=control_dispatch module=http status=error error_code=worker_failed error={}",
                err
            );
            ControlResponse::internal_error("dispatcher task failed")
        });
    Json(response)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}
