//! Prompt-Puppet Server
//!
//! Axum backend that turns free-text prompts into animation sequences and
//! serves the player's static files.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::ServerConfig,
    service::director::{Director, OpenAiDirector},
};

mod config;
mod handler;
mod service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    if config.openai_api_key.is_none() {
        tracing::warn!("[server] OPENAI_API_KEY is not set, /api/sequence will fail");
    }
    for (name, dir) in [
        ("public", &config.public_dir),
        ("assets", &config.assets_dir),
        ("shared", &config.shared_dir),
    ] {
        tracing::info!("[server] {name} dir {} (exists: {})", dir.display(), dir.exists());
    }

    let addr = config.addr();
    let app = handler::router(&config, Director::OpenAi(OpenAiDirector::new(&config)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Server listening on {addr}");
    tracing::info!("  - Sequence API: http://{addr}/api/sequence");
    tracing::info!("  - Health: http://{addr}/health");
    tracing::info!("  - Player: http://{addr}/");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
