use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tandem_server::{AppState, ServerConfig, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log))
        .init();

    info!("Initializing signaling relay...");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Signaling server listening on http://{}", listener.local_addr()?);

    serve(listener, Arc::new(AppState::new()))
        .await
        .context("signaling server stopped")?;

    Ok(())
}
