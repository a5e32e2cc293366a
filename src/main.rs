// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use power_telemetry_dashboard::application::sampling_service::SamplingScheduler;
use power_telemetry_dashboard::domain::clock::SystemClock;
use power_telemetry_dashboard::infrastructure::config::load_dashboard_config;
use power_telemetry_dashboard::infrastructure::http_feed::feed_for_source;
use power_telemetry_dashboard::presentation::app_state::AppState;
use power_telemetry_dashboard::presentation::handlers::{
    change_page, change_page_size, charts, dashboard, health_check, table,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Feed adapters (infrastructure layer)
    let feed = feed_for_source(&config.feed.source);
    let parser = Arc::new(config.feed.format);

    // Start sampling (application layer)
    let scheduler = SamplingScheduler::new(
        feed,
        parser,
        Arc::new(SystemClock),
        config.scheduler_config(),
    );
    let mut handle = scheduler.start();

    let state = Arc::new(AppState::new(handle.snapshots(), handle.clock()));

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/charts", get(charts))
        .route("/table", get(table))
        .route("/table/page/:page", post(change_page))
        .route("/table/page-size/:size", post(change_page_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .addr
        .parse()
        .with_context(|| format!("invalid server.addr {:?}", config.server.addr))?;
    tracing::info!("Starting power-telemetry-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    handle.shutdown().await;
    Ok(())
}

/// Resolves when `signal` fires. A handler that failed to install never
/// resolves, so the server keeps running.
async fn shutdown_signal<S>(signal: S)
where
    S: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
