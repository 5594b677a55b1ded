//! Durable key-value slot contracts and implementations.
//!
//! # Responsibility
//! - Provide the `key -> string` medium persistence adapters write into.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `write_slot` replaces the whole value in one statement; readers never
//!   observe a partial value.
//! - Reading a missing key is `Ok(None)`, not an error.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot medium failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Medium refused the operation (quota, read-only, detached...).
    Unavailable(String),
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Db(err) => err.error_code(),
            Self::Unavailable(_) => "storage_unavailable",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
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

/// Durable `key -> string` medium.
pub trait SlotRepository {
    /// Returns the stored value, or `None` when the key was never written.
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<T: SlotRepository + ?Sized> SlotRepository for &T {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write_slot(key, value)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
#[derive(Clone, Copy)]
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, slot_value)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                slot_value = excluded.slot_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=slot_write module=repo status=ok backend=sqlite bytes={}",
            value.len()
        );
        Ok(())
    }
}

/// Process-local slot repository.
///
/// Clones share the same map. Used by tests and as the fallback medium when
/// no database can be opened.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotRepository {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotRepository for MemorySlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySlotRepository, SlotRepository, SqliteSlotRepository};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_slot_overwrites_existing_value() {
        let conn = open_db_in_memory().expect("in-memory db");
        let repo = SqliteSlotRepository::new(&conn);

        assert_eq!(repo.read_slot("k").expect("read"), None);
        repo.write_slot("k", "[1]").expect("first write");
        repo.write_slot("k", "[2]").expect("second write");
        assert_eq!(repo.read_slot("k").expect("read"), Some("[2]".to_string()));
    }

    #[test]
    fn memory_slot_clones_share_state() {
        let repo = MemorySlotRepository::new();
        let view = repo.clone();
        repo.write_slot("theme", "dark").expect("write");
        assert_eq!(view.read_slot("theme").expect("read").as_deref(), Some("dark"));
    }
}
