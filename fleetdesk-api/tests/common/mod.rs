/// Common test utilities for integration tests
///
/// Builds the full router around the in-memory identity store, so the tests
/// exercise every layer above persistence without needing Postgres.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use fleetdesk_api::app::{build_router, AppState};
use fleetdesk_api::config::{ApiConfig, Config, DatabaseConfig};
use fleetdesk_shared::config::AuthConfig;
use fleetdesk_shared::store::MemoryIdentityStore;
use serde_json::Value;

/// Test context wrapping the router and its backing store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryIdentityStore>,
}

impl TestContext {
    /// Creates a test context with a fresh in-memory store
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Creates a test context with a caller-supplied configuration
    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryIdentityStore::new());
        let state = AppState::new(store.clone(), config);

        Self {
            app: build_router(state),
            store,
        }
    }
}

/// Configuration for tests: in-memory friendly, cheap hash cost
pub fn test_config() -> Config {
    let mut auth = AuthConfig::new("integration-test-secret-at-least-32-bytes");
    auth.hash_cost = 12;

    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused-in-tests/fleetdesk".to_string(),
            max_connections: 1,
        },
        auth,
    }
}

/// Builds a JSON POST request
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a GET request with an optional Authorization header
pub fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
