//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, so the views can be exercised without
//! network access or a database file.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reel_core::testing::MockCatalogReader;
use reel_core::{CatalogReader, Config, KeyValueStorage, MemoryStorage, WatchlistStore};

/// Re-export fixtures for test convenience
pub use reel_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_save_movie() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/watchlist", json!({"id": 27205})).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure listings and details
    pub catalog: Arc<MockCatalogReader>,
    /// The watchlist behind the router
    pub watchlist: Arc<WatchlistStore>,
    /// Storage the watchlist persists to
    pub storage: Arc<MemoryStorage>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty watchlist and a mock catalog.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let config = Config::default();

        let mut storage = MemoryStorage::new();
        if let Some(raw) = test_config.stored_watchlist {
            storage = storage.with_entry(config.storage.watchlist_key.clone(), raw);
        }
        let storage = Arc::new(storage);

        let watchlist = Arc::new(WatchlistStore::open(
            Arc::clone(&storage) as Arc<dyn KeyValueStorage>,
            config.storage.watchlist_key.clone(),
        ));

        let catalog = Arc::new(MockCatalogReader::new());
        let reader = if test_config.without_catalog {
            None
        } else {
            Some(Arc::clone(&catalog) as Arc<dyn CatalogReader>)
        };

        let state = Arc::new(reel_server::state::AppState::new(
            config,
            Arc::clone(&watchlist),
            reader,
        ));

        let router = reel_server::api::create_router(state);

        Self {
            router,
            catalog,
            watchlist,
            storage,
        }
    }

    /// Serve the router on an ephemeral local port, for clients that need a real socket.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        addr
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Run without a catalog reader, as when TMDB is not configured
    pub without_catalog: bool,
    /// Raw snapshot present in storage before the watchlist is opened
    pub stored_watchlist: Option<String>,
}

impl TestConfig {
    pub fn without_catalog() -> Self {
        Self {
            without_catalog: true,
            ..Default::default()
        }
    }

    pub fn with_stored_watchlist(raw: &str) -> Self {
        Self {
            stored_watchlist: Some(raw.to_string()),
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
