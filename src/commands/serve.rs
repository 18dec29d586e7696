//! Serve command implementation

use anyhow::{Context, Result};
use indodax_signals::api::{self, AppState};
use indodax_signals::Config;
use std::sync::Arc;
use tracing::info;

pub fn run(config: Config, bind_override: Option<String>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run_async(config, bind_override))
}

async fn run_async(config: Config, bind_override: Option<String>) -> Result<()> {
    let bind_addr = bind_override.unwrap_or_else(|| config.server.bind.clone());

    let client = super::client(&config)?;
    let state = AppState::from_config(client, &config).context("Failed to create engines")?;
    let app = api::router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", bind_addr))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
