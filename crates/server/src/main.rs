use std::sync::Arc;

use anyhow::Context;
use sitespec_core::Analyzer;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod handlers;
mod routes;

use config::ServerConfig;
use handlers::AppState;

const DEFAULT_LOG_FILTER: &str = "sitespec_server=info,sitespec_core=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = ServerConfig::from_env()?;
    // The blocking HTTP client must be built outside the async workers.
    let analyzer = tokio::task::spawn_blocking(Analyzer::new)
        .await
        .context("Client setup task failed")?
        .context("Failed to build HTTP client")?;
    let app = routes::create_routes(Arc::new(AppState { analyzer }), config.request_timeout);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, timeout_secs = config.request_timeout.as_secs(), "sitespec server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
