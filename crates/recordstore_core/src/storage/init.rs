//! Startup bootstrap for every persisted resource.
//!
//! # Responsibility
//! - Create the `files` table, archive directory and activity log if absent.
//! - Report what had to be created so the caller can surface it.
//!
//! # Invariants
//! - Idempotent: a second run creates nothing.
//! - Failures are returned, never swallowed; callers treat them as fatal.

use super::{ActivityLog, ArchiveWriter, StorageError};
use crate::config::StorageConfig;
use crate::db::{open_db, schema_version, DbError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type InitResult<T> = Result<T, InitError>;

#[derive(Debug)]
pub enum InitError {
    Db(DbError),
    Storage(StorageError),
}

impl Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database bootstrap failed: {err}"),
            Self::Storage(err) => write!(f, "storage bootstrap failed: {err}"),
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<DbError> for InitError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StorageError> for InitError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// What `initialize_storage` found missing and created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageReport {
    pub db_created: bool,
    pub archive_created: bool,
    pub log_created: bool,
    pub schema_version: u32,
}

/// Ensures the database schema, archive directory and activity log exist.
pub fn initialize_storage(config: &StorageConfig) -> InitResult<StorageReport> {
    let started_at = Instant::now();
    info!("event=storage_init module=storage status=start");

    match bootstrap(config) {
        Ok(report) => {
            info!(
                "event=storage_init module=storage status=ok duration_ms={} db_created={} archive_created={} log_created={} schema_version={}",
                started_at.elapsed().as_millis(),
                report.db_created,
                report.archive_created,
                report.log_created,
                report.schema_version
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=storage_init module=storage status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap(config: &StorageConfig) -> InitResult<StorageReport> {
    let db_created = !config.db_path.exists();
    if db_created {
        info!(
            "event=db_create module=storage status=start path={}",
            config.db_path.display()
        );
    }
    let conn = open_db(&config.db_path)?;
    let schema_version = schema_version(&conn)?;
    drop(conn);

    let archive = ArchiveWriter::new(&config.archive_dir);
    let archive_created = archive.ensure_dir()?;
    if archive_created {
        info!(
            "event=archive_create module=storage status=ok path={}",
            config.archive_dir.display()
        );
    }

    let log = ActivityLog::new(&config.log_file);
    let log_created = log.ensure_exists()?;
    if log_created {
        info!(
            "event=activity_log_create module=storage status=ok path={}",
            config.log_file.display()
        );
    }

    Ok(StorageReport {
        db_created,
        archive_created,
        log_created,
        schema_version,
    })
}
