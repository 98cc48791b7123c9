// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::status_monitor::StatusMonitor;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_repository::HttpPingRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;
    let settings = config.dashboard.settings()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpPingRepository::new(
        &config.backend.base_url,
        config.backend.timeout(),
    )?);

    // Create services (application layer)
    let dashboard = DashboardService::new(repository.clone(), settings);
    if let Err(e) = dashboard.reload().await {
        // The session stays empty until POST /api/reload succeeds
        tracing::error!("Initial load from {} failed: {:#}", config.backend.base_url, e);
    }

    let status = StatusMonitor::new(repository, config.dashboard.status_interval());
    status.clone().spawn();

    // Create application state
    let state = Arc::new(AppState { dashboard, status });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!("Starting ping-dashboard on {}, backend {}", addr, config.backend.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
