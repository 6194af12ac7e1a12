//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Watchlist mutations and persistence failures
//! - Catalog reader requests

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Watchlist Metrics
// =============================================================================

/// Watchlist operations by kind and outcome.
pub static WATCHLIST_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reel_watchlist_operations_total",
            "Total watchlist add/remove operations",
        ),
        &["operation", "result"], // operation: "add", "remove"; result: "changed", "noop"
    )
    .unwrap()
});

/// Persistence failures that were recovered from.
pub static WATCHLIST_PERSISTENCE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reel_watchlist_persistence_failures_total",
            "Watchlist persistence failures (recovered, non-fatal)",
        ),
        &["kind"], // "read", "write", "corrupt", "entry"
    )
    .unwrap()
});

/// Current number of saved items.
pub static WATCHLIST_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("reel_watchlist_items", "Number of items in the watchlist").unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog reader requests by endpoint and outcome.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reel_catalog_requests_total",
            "Total requests made to the remote catalog",
        ),
        &["endpoint", "result"], // result: "success", "not_found", "error"
    )
    .unwrap()
});

/// Catalog reader request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reel_catalog_request_duration_seconds",
            "Duration of requests to the remote catalog",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Watchlist
        Box::new(WATCHLIST_OPERATIONS.clone()),
        Box::new(WATCHLIST_PERSISTENCE_FAILURES.clone()),
        Box::new(WATCHLIST_ITEMS.clone()),
        // Catalog
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        WATCHLIST_OPERATIONS
            .with_label_values(&["add", "changed"])
            .inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"reel_watchlist_operations_total".to_string()));
    }
}
