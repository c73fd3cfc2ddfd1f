//! Content Query Service — Binary Entrypoint
//! Boots the Axum HTTP server over the configured collection sources.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wp_content_query::api::{self, AppState};
use wp_content_query::metrics::QueryMetrics;
use wp_content_query::query::config::QueryConfig;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wp_content_query=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = QueryConfig::load_default()?;

    // Recorder first, so the query layer's series registration lands on it.
    let metrics = QueryMetrics::init(cfg.sources.len());
    let query = cfg.build_query()?;

    let state = AppState {
        query: Arc::new(query),
    };
    let router = api::create_router(state).merge(metrics.router());

    tracing::info!(bind = %cfg.bind, sources = cfg.sources.len(), "serving content query api");
    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
