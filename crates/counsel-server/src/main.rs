//! Counsel Server: application entry point.

use std::sync::Arc;

use counsel_core::clock::SystemClock;
use counsel_docgen::HttpSectionDrafter;
use counsel_server::{ServerConfig, build_generator, router, spawn_sweeper};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("counsel=info".parse()?))
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        bind = %config.bind,
        templates = %config.catalog.template_dir.display(),
        session_ttl_secs = config.auth.session_ttl_secs,
        "Starting Counsel server..."
    );

    let drafter = HttpSectionDrafter::new(config.drafting.clone())?;
    let generator = Arc::new(build_generator(&config, SystemClock, drafter)?);
    let sweeper = spawn_sweeper(Arc::clone(&generator), config.sweep_interval);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, router(generator))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Counsel server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
