//! Watchlist: the user's saved-for-later catalog items.
//!
//! The [`WatchlistStore`] owns an insertion-ordered list of items with unique
//! ids, writes the full list to key/value storage after every mutation and
//! notifies subscribers of each change. Persistence problems are logged and
//! recorded, never returned to callers.

mod events;
pub mod snapshot;
mod store;

pub use events::{WatchlistEvent, WatchlistEventEnvelope};
pub use store::WatchlistStore;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised while loading or saving the watchlist snapshot.
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Corrupt watchlist snapshot: {0}")]
    Corrupt(String),

    #[error("Failed to encode watchlist snapshot: {0}")]
    Encode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
