use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, ItemId};

/// A change to the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WatchlistEvent {
    /// An item was appended.
    Added { item: CatalogItem },
    /// An item was removed.
    Removed { id: ItemId },
    /// State was replaced by re-reading storage.
    Reloaded { count: usize },
}

impl WatchlistEvent {
    /// Short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            WatchlistEvent::Added { .. } => "added",
            WatchlistEvent::Removed { .. } => "removed",
            WatchlistEvent::Reloaded { .. } => "reloaded",
        }
    }
}

/// Envelope wrapping a watchlist event with the time it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEventEnvelope {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: WatchlistEvent,
}

impl WatchlistEventEnvelope {
    pub fn now(event: WatchlistEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}
