//! Record use-case service.
//!
//! # Responsibility
//! - Provide the add/list/get/delete entry points used by the HTTP layer.
//! - Turn repository `None` lookups into semantic `NotFound` errors.
//!
//! # Invariants
//! - `delete_file` succeeds whether or not the id existed.
//! - Service layer remains storage-agnostic.

use crate::model::record::{NewRecord, Record, RecordId, RecordSummary};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};

/// Use-case service wrapper for record CRUD operations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new record and returns its assigned id.
    pub fn add_file(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> RepoResult<RecordId> {
        self.repo.create_record(&NewRecord::new(name, content))
    }

    /// Lists every record as `(id, name)`; empty when the table is empty.
    pub fn list_files(&self) -> RepoResult<Vec<RecordSummary>> {
        self.repo.list_records()
    }

    /// Gets one record by id.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no row matches.
    pub fn get_file(&self, id: RecordId) -> RepoResult<Record> {
        self.repo.get_record(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Deletes one record by id; missing ids are not an error.
    pub fn delete_file(&self, id: RecordId) -> RepoResult<()> {
        self.repo.delete_record(id)?;
        Ok(())
    }
}
