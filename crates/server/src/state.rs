use std::sync::Arc;
use reel_core::{CatalogReader, Config, SanitizedConfig, WatchlistStore};

/// Shared application state
pub struct AppState {
    config: Config,
    watchlist: Arc<WatchlistStore>,
    catalog: Option<Arc<dyn CatalogReader>>,
}

impl AppState {
    pub fn new(
        config: Config,
        watchlist: Arc<WatchlistStore>,
        catalog: Option<Arc<dyn CatalogReader>>,
    ) -> Self {
        Self {
            config,
            watchlist,
            catalog,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    /// Catalog reader, if TMDB is configured.
    pub fn catalog(&self) -> Option<&Arc<dyn CatalogReader>> {
        self.catalog.as_ref()
    }
}
