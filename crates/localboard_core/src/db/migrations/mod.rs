//! Schema registry for the slot database.
//!
//! # Responsibility
//! - List every `kv_slots` schema step this build knows about.
//! - Bring an opened database up to the newest step in one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and grow by exactly one.
//! - `PRAGMA user_version` always equals the last committed step.
//! - A database stamped by a newer build is refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One forward-only schema step.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    label: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    label: "kv_slots",
    sql: include_str!("0001_kv_slots.sql"),
}];

/// Newest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Upgrades `conn` to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was stamped by a newer build.
/// - `Sqlite` when a step fails; the transaction rolls back and the stamp
///   stays at its previous value.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stamped = stamped_version(conn)?;
    let latest = latest_version();
    if stamped > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stamped,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > stamped)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=step version={} label={}",
            step.version, step.label
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={stamped} to_version={latest}");
    Ok(())
}

fn stamped_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, stamped_version, SCHEMA_STEPS};
    use rusqlite::Connection;

    #[test]
    fn step_versions_are_contiguous_from_one() {
        for (index, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.label);
        }
        assert_eq!(latest_version() as usize, SCHEMA_STEPS.len());
    }

    #[test]
    fn reapplying_on_an_upgraded_database_is_a_no_op() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        apply_migrations(&mut conn).expect("first upgrade");
        apply_migrations(&mut conn).expect("second upgrade");
        assert_eq!(stamped_version(&conn).expect("stamp"), latest_version());
    }
}
