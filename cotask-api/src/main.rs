//! # CoTask API Server
//!
//! This is the main API server for CoTask, a collaborative task tracker:
//! - User registration, login, and profile management (JWT auth)
//! - Task CRUD with permissions, filtering, and due-date sorting
//! - Persisted notifications for task assignment
//! - Real-time WebSocket fan-out of task and notification events
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p cotask-api
//! ```

use cotask_api::{
    app::{build_router, AppState},
    config::Config,
};
use cotask_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cotask_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "CoTask API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and apply migrations
    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // Build application
    let state = AppState::new(db.clone(), config.clone());
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received, draining...");
}
