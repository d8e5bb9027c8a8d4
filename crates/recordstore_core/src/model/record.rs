//! Record domain model.
//!
//! # Invariants
//! - `id` is assigned by SQLite on insert, strictly increasing, never reused.
//! - `name` and `content` are free text; no uniqueness or length limit.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a record row.
pub type RecordId = i64;

/// Input for record creation; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub content: String,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Full persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub content: String,
}

/// List projection of a record; content is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub name: String,
}
