//! SQLite-backed key/value storage.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{check_quota, KeyValueStorage, StorageError};

/// SQLite-backed key/value storage.
pub struct SqliteKeyValueStorage {
    conn: Mutex<Connection>,
    quota: Option<usize>,
}

impl SqliteKeyValueStorage {
    /// Open (or create) the database file and the table if needed.
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            quota: None,
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            quota: None,
        })
    }

    /// Reject values larger than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }
}

impl KeyValueStorage for SqliteKeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(self.quota, key, value)?;
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute("DELETE FROM kv_store WHERE key = ?", params![key])
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_overwrite() {
        let storage = SqliteKeyValueStorage::in_memory().unwrap();
        storage.set("watchlist", "[]").unwrap();
        storage.set("watchlist", "[{\"id\":1}]").unwrap();
        assert_eq!(
            storage.get("watchlist").unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );
    }

    #[test]
    fn test_remove() {
        let storage = SqliteKeyValueStorage::in_memory().unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
        // Removing again is fine
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kv.db");

        {
            let storage = SqliteKeyValueStorage::new(&path).unwrap();
            storage.set("k", "persisted").unwrap();
        }

        let reopened = SqliteKeyValueStorage::new(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = SqliteKeyValueStorage::in_memory().unwrap().with_quota(2);
        let err = storage.set("k", "toolong").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(storage.get("k").unwrap().is_none());
    }
}
