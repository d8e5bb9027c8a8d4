//! Schema history of the record store database.
//!
//! The store has a single table, `files(id, name, content)`. Each entry in
//! `MIGRATIONS` moves the schema one `PRAGMA user_version` step forward and
//! all pending steps share one transaction.
//!
//! Migration 1 is `CREATE TABLE IF NOT EXISTS`: a database that already holds
//! a `files` table at version 0 (created before versioning existed) is adopted
//! as-is and only gets its version stamped.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "files_table",
    sql: include_str!("0001_files.sql"),
}];

/// Newest schema version this build can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Schema version stamped in the database (`0` for a fresh file).
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build;
///   nothing is touched in that case.
/// - Any SQLite failure; the transaction is rolled back on drop.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    for migration in pending {
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, schema_version, MIGRATIONS};
    use rusqlite::Connection;

    #[test]
    fn registry_versions_start_at_one_and_increase() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1);
        }
    }

    #[test]
    fn files_table_has_id_name_content_columns() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
        apply_migrations(&mut conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(files);").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(columns, ["id", "name", "content"]);
    }
}
