//! HTTP server entry point for the Scheduling Engine.
//!
//! Environment:
//! - `ENGINE_CONFIG_DIR`: configuration directory (default `./config/default`)
//! - `ENGINE_PORT`: listen port (default 3100)
//! - `RUST_LOG`: log filter (default `scheduling_engine=info,warn`)

use std::net::SocketAddr;

use anyhow::Context;
use scheduling_engine::api::{AppState, create_router};
use scheduling_engine::config::ConfigLoader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_PORT: u16 = 3100;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduling_engine=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("ENGINE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let port: u16 = std::env::var("ENGINE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let config = match ConfigLoader::load(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            warn!(
                config_dir = %config_dir,
                error = %err,
                "Falling back to built-in configuration"
            );
            ConfigLoader::default()
        }
    };

    let app = create_router(AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "Scheduling engine listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
