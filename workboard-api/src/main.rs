//! # Workboard API Server
//!
//! This is the main API server for Workboard, providing role-based project
//! and task tracking endpoints.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Authentication (JWT access + refresh tokens)
//! - User administration (roles)
//! - Project and membership management
//! - Task lifecycle endpoints (create, assign, start, complete)
//! - Per-project dashboard aggregation
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p workboard-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use workboard_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Workboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DatabaseConfig::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
