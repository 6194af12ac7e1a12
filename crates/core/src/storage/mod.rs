//! Key/value storage used to persist client state across restarts.
//!
//! Values are opaque strings addressed by a key, the same contract a browser's
//! local storage offers. Backends may enforce a per-value size quota.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteKeyValueStorage;

use thiserror::Error;

/// Errors for key/value storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Quota exceeded: value for '{key}' is {size} bytes, limit is {limit}")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Trait for key/value storage backends.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub(crate) fn check_quota(
    limit: Option<usize>,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    match limit {
        Some(limit) if value.len() > limit => Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
