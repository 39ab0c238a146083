pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

pub use config::Config;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    info!("Tillgate v{} starting...", env!("CARGO_PKG_VERSION"));

    let shared = Arc::new(SharedState::new(config.clone()).await?);
    let app_state = api::create_app_state(shared).await;

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let addr = format!("{}:{}", config.server.bind_address, config.server.port);
        info!("Starting terminal API on {}", addr);

        let app = api::router(app_state).await;
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("API server error: {}", e);
            }
        }))
    } else {
        None
    };

    info!("Engine running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}
