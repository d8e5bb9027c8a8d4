//! HTTP error mapping for the record endpoints.
//!
//! Database and filesystem failures are logged with their raw text and
//! answered with a fixed message; not-found and bad-request errors carry
//! caller-facing detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use recordstore_core::{RepoError, StorageError};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tokio::task::JoinError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal(error_code: &'static str, message: &'static str, cause: impl Display) -> Self {
        error!(
            "event=http_error module=http status=error error_code={} error={}",
            error_code, cause
        );
        Self::Internal(message)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) | Self::BadRequest(message) => write!(f, "{message}"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound(value.to_string()),
            RepoError::Db(err) => Self::internal("db_failed", "database operation failed", err),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::InvalidPath { .. } => Self::BadRequest(value.to_string()),
            StorageError::Io { .. } => {
                Self::internal("archive_write_failed", "archive write failed", value)
            }
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(value: JoinError) -> Self {
        Self::internal("worker_failed", "request worker failed", value)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use recordstore_core::storage::PathRejection;
    use recordstore_core::{RepoError, StorageError};

    #[test]
    fn not_found_maps_to_404_with_message() {
        let err = ApiError::from(RepoError::NotFound(9999));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "file not found: 9999");
    }

    #[test]
    fn rejected_archive_name_maps_to_400() {
        let err = ApiError::from(StorageError::InvalidPath {
            name: "../x".to_string(),
            reason: PathRejection::Separator,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn io_failure_hides_raw_error_text() {
        let err = ApiError::from(StorageError::Io {
            path: "/secret/location".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("secret"));
    }
}
