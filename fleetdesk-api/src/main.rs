//! # FleetDesk API Server
//!
//! HTTP surface over the FleetDesk authentication core: registration,
//! login, token refresh, and bearer-token request authentication.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p fleetdesk-api
//! ```

use std::sync::Arc;

use fleetdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use fleetdesk_shared::store::PgIdentityStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "FleetDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let state = AppState::new(Arc::new(PgIdentityStore::new(pool)), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install shutdown signal handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, exiting...");
}
