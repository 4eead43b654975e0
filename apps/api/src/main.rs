mod config;
mod db;
mod errors;
mod jobs;
mod routes;
mod scoring;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{close_pool, create_pool};
use crate::routes::build_router;
use crate::scoring::scorer::{CompatibilityScorer, RemoteScorer, SimulatedScorer};
use crate::state::AppState;
use crate::store::PgDocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job board API v{}", env!("CARGO_PKG_VERSION"));

    // One pool for the whole process, closed on shutdown
    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgDocumentStore::new(pool.clone(), config.jobs_schema.clone()));
    info!("Job partitions read from schema '{}'", config.jobs_schema);

    let scorer = build_scorer(&config)?;
    info!("Compatibility scorer: {}", scorer.backend());

    let state = AppState { store, scorer };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    Ok(())
}

/// Remote endpoint when configured; the simulated fallback otherwise.
fn build_scorer(config: &Config) -> Result<Arc<dyn CompatibilityScorer>> {
    match &config.scoring_endpoint_url {
        Some(url) => {
            info!(
                "Scoring endpoint {url} (timeout {}s)",
                config.scoring_timeout.as_secs()
            );
            Ok(Arc::new(RemoteScorer::new(url.clone(), config.scoring_timeout)?))
        }
        None => {
            warn!("SCORING_ENDPOINT_URL not set; compatibility results will be simulated");
            Ok(Arc::new(SimulatedScorer))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}
