//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/get/delete over the `files` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Each call is a single statement; no transaction spans calls.
//! - Delete never reports a missing row as an error.
//! - List order is `id ASC`, i.e. insertion order.

use crate::db::DbError;
use crate::model::record::{NewRecord, Record, RecordId, RecordSummary};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(RecordId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "file not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record CRUD operations.
pub trait RecordRepository {
    fn create_record(&self, record: &NewRecord) -> RepoResult<RecordId>;
    fn list_records(&self) -> RepoResult<Vec<RecordSummary>>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Returns the number of removed rows (0 or 1).
    fn delete_record(&self, id: RecordId) -> RepoResult<usize>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, record: &NewRecord) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO files (name, content) VALUES (?1, ?2);",
            params![record.name.as_str(), record.content.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();

        info!(
            "event=record_create module=repo status=ok id={} content_bytes={}",
            id,
            record.content.len()
        );
        Ok(id)
    }

    fn list_records(&self) -> RepoResult<Vec<RecordSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM files ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(RecordSummary {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }

        debug!(
            "event=record_list module=repo status=ok count={}",
            records.len()
        );
        Ok(records)
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, content FROM files WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Record {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        content: row.get("content")?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM files WHERE id = ?1;", [id])?;

        info!(
            "event=record_delete module=repo status=ok id={} removed={}",
            id, removed
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordRepository, SqliteRecordRepository};
    use crate::db::open_db_in_memory;
    use crate::model::record::NewRecord;

    #[test]
    fn get_missing_record_returns_none() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteRecordRepository::new(&conn);
        assert!(repo.get_record(42).unwrap().is_none());
    }

    #[test]
    fn delete_reports_removed_row_count() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteRecordRepository::new(&conn);
        let id = repo.create_record(&NewRecord::new("a.txt", "x")).unwrap();

        assert_eq!(repo.delete_record(id).unwrap(), 1);
        assert_eq!(repo.delete_record(id).unwrap(), 0);
    }
}
