/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use fleetdesk_api::{app::{build_router, AppState}, config::Config};
/// use fleetdesk_shared::store::PgIdentityStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = sqlx::PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgIdentityStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use fleetdesk_shared::{
    auth::{bearer_auth, AuthService},
    store::IdentityStore,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, middleware::security::SecurityHeadersLayer};

/// Shared application state
///
/// Cloned into each request handler via Axum's `State` extractor; everything
/// inside is behind `Arc`, so cloning is cheap and all sharing is read-only.
#[derive(Clone)]
pub struct AppState {
    /// Identity store handle
    pub store: Arc<dyn IdentityStore>,

    /// Authentication service (token codec + store)
    pub auth: Arc<AuthService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state around a store and configuration
    pub fn new(store: Arc<dyn IdentityStore>, config: Config) -> Self {
        let auth = Arc::new(AuthService::new(&config.auth, store.clone()));

        Self {
            store,
            auth,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── /health                  # Health check (public)
/// └── /v1/
///     └── /auth/
///         ├── POST /register   # public
///         ├── POST /login      # public
///         ├── POST /refresh    # public
///         └── GET  /me         # bearer token required
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let protected_auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .layer(axum::middleware::from_fn(bearer_auth(state.auth.clone())));

    let v1_routes = Router::new().nest("/auth", public_auth_routes.merge(protected_auth_routes));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
