//! Domain model for stored records.
//!
//! # Responsibility
//! - Define the record shapes shared by repository, service and HTTP layers.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - Records are immutable once written; deletion is a hard delete.

pub mod record;
