use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::events::{WatchlistEvent, WatchlistEventEnvelope};
use super::{snapshot, WatchlistError};
use crate::catalog::{dedup_by_id, CatalogItem, ItemId};
use crate::metrics::{WATCHLIST_ITEMS, WATCHLIST_OPERATIONS, WATCHLIST_PERSISTENCE_FAILURES};
use crate::storage::KeyValueStorage;

const EVENT_CHANNEL_CAPACITY: usize = 256;

struct State {
    items: Vec<CatalogItem>,
    last_persistence_error: Option<String>,
}

/// Persisted, de-duplicated, insertion-ordered watchlist.
///
/// Every operation takes an internal lock for its whole duration, including
/// the storage write, so operations never interleave. After `add` or `remove`
/// returns, storage holds the same list as memory unless the write failed, in
/// which case the failure is logged and available from
/// [`last_persistence_error`](Self::last_persistence_error).
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    state: Mutex<State>,
    events: broadcast::Sender<WatchlistEventEnvelope>,
}

impl WatchlistStore {
    /// Load the watchlist stored under `key`.
    ///
    /// A missing, unreadable or corrupt snapshot yields an empty watchlist.
    /// Individual entries without a usable id are skipped.
    pub fn open(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (items, last_persistence_error) = load(storage.as_ref(), &key);
        info!("Watchlist loaded: {} items from key '{}'", items.len(), key);
        WATCHLIST_ITEMS.set(items.len() as i64);

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            key,
            state: Mutex::new(State {
                items,
                last_persistence_error,
            }),
            events,
        }
    }

    /// Storage key holding the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append `item` unless an item with the same id is already saved.
    ///
    /// Returns whether the item was inserted. An existing entry keeps its
    /// position and its original field values.
    pub fn add(&self, item: CatalogItem) -> bool {
        let mut state = self.lock();

        let inserted = !state.items.iter().any(|saved| saved.id == item.id);
        if inserted {
            state.items.push(item.clone());
        }
        self.persist(&mut state);

        WATCHLIST_OPERATIONS
            .with_label_values(&["add", if inserted { "changed" } else { "noop" }])
            .inc();

        if inserted {
            debug!("Watchlist add: id={}", item.id);
            self.notify(WatchlistEvent::Added { item });
        }
        inserted
    }

    /// Remove the item with `id`. Returns whether anything was removed.
    pub fn remove(&self, id: &ItemId) -> bool {
        let mut state = self.lock();

        let before = state.items.len();
        state.items.retain(|saved| &saved.id != id);
        let removed = state.items.len() != before;
        self.persist(&mut state);

        WATCHLIST_OPERATIONS
            .with_label_values(&["remove", if removed { "changed" } else { "noop" }])
            .inc();

        if removed {
            debug!("Watchlist remove: id={}", id);
            self.notify(WatchlistEvent::Removed { id: id.clone() });
        }
        removed
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.lock().items.iter().any(|saved| &saved.id == id)
    }

    /// Copy of the saved items in insertion order.
    pub fn list(&self) -> Vec<CatalogItem> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Receive an event for every effective mutation and reload.
    pub fn subscribe(&self) -> broadcast::Receiver<WatchlistEventEnvelope> {
        self.events.subscribe()
    }

    /// Replace in-memory state with what storage currently holds.
    ///
    /// Writes made by another process sharing the storage become visible only
    /// through this call.
    pub fn reload(&self) {
        let mut state = self.lock();
        let (items, error) = load(self.storage.as_ref(), &self.key);
        let count = items.len();
        state.items = items;
        state.last_persistence_error = error;
        WATCHLIST_ITEMS.set(count as i64);

        info!("Watchlist reloaded: {} items", count);
        self.notify(WatchlistEvent::Reloaded { count });
    }

    /// Message of the most recent persistence failure, cleared by the next successful write.
    pub fn last_persistence_error(&self) -> Option<String> {
        self.lock().last_persistence_error.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &mut State) {
        WATCHLIST_ITEMS.set(state.items.len() as i64);

        let result = snapshot::encode(&state.items).and_then(|raw| {
            self.storage
                .set(&self.key, &raw)
                .map_err(WatchlistError::from)
        });

        match result {
            Ok(()) => state.last_persistence_error = None,
            Err(e) => {
                warn!(
                    "Failed to persist watchlist under '{}' ({} items kept in memory): {}",
                    self.key,
                    state.items.len(),
                    e
                );
                WATCHLIST_PERSISTENCE_FAILURES
                    .with_label_values(&["write"])
                    .inc();
                state.last_persistence_error = Some(e.to_string());
            }
        }
    }

    fn notify(&self, event: WatchlistEvent) {
        // Ignore send errors - they just mean no one is listening
        let _ = self.events.send(WatchlistEventEnvelope::now(event));
    }
}

/// Read and decode the snapshot, recovering from every failure with an empty list.
fn load(storage: &dyn KeyValueStorage, key: &str) -> (Vec<CatalogItem>, Option<String>) {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), None),
        Err(e) => {
            warn!("Failed to read watchlist under '{}', starting empty: {}", key, e);
            WATCHLIST_PERSISTENCE_FAILURES
                .with_label_values(&["read"])
                .inc();
            return (Vec::new(), Some(WatchlistError::from(e).to_string()));
        }
    };

    match snapshot::decode(&raw) {
        Ok(items) => {
            let stored = items.len();
            let items = dedup_by_id(items);
            if items.len() != stored {
                warn!(
                    "Watchlist snapshot under '{}' had {} duplicate ids, keeping first occurrences",
                    key,
                    stored - items.len()
                );
            }
            (items, None)
        }
        Err(e) => {
            warn!("Discarding corrupt watchlist under '{}': {}", key, e);
            WATCHLIST_PERSISTENCE_FAILURES
                .with_label_values(&["corrupt"])
                .inc();
            (Vec::new(), Some(e.to_string()))
        }
    }
}
