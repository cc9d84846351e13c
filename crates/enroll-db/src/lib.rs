pub mod migrations;
pub mod repository;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Local key-value store backing the whole system. String keys map to
/// JSON-encoded values; record collections live under one key each and
/// are rewritten whole on every mutation. Single-client by design.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Volatile store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&conn)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = datetime('now')",
                (key, value),
            )?;
            Ok(())
        })
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_none_for_missing_key() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get("teachers").unwrap(), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = Store::open_in_memory().unwrap();
        store.put("teachers", "[]").unwrap();
        assert_eq!(store.get("teachers").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn put_overwrites_existing_value() {
        let store = Store::open_in_memory().unwrap();
        store.put("session", "a").unwrap();
        store.put("session", "b").unwrap();
        assert_eq!(store.get("session").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn delete_removes_key() {
        let store = Store::open_in_memory().unwrap();
        store.put("session", "a").unwrap();
        store.delete("session").unwrap();
        assert_eq!(store.get("session").unwrap(), None);

        // Deleting an absent key is a no-op.
        store.delete("session").unwrap();
    }
}
