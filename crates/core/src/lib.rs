pub mod catalog;
pub mod config;
pub mod metrics;
pub mod storage;
pub mod testing;
pub mod watchlist;

pub use catalog::{
    CatalogError, CatalogItem, CatalogPage, CatalogReader, ItemId, MediaType, TmdbClient,
    TmdbConfig,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteKeyValueStorage, StorageError};
pub use watchlist::{WatchlistError, WatchlistEvent, WatchlistEventEnvelope, WatchlistStore};
