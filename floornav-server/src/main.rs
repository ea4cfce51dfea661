mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use floornav_core::{Floorplan, load_floorplan};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

/// HTTP service for editing floorplans and querying indoor routes
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `[server].bind`
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Floorplan document, overrides `[floorplan].path`
    #[arg(long)]
    floorplan: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(path) = args.floorplan {
        config.floorplan.path = Some(path);
    }

    let floorplan = match &config.floorplan.path {
        Some(path) if path.exists() => load_floorplan(path)?,
        Some(path) => {
            tracing::warn!("{} does not exist yet, starting empty", path.display());
            Floorplan::new()
        }
        None => Floorplan::new(),
    };

    let state = AppState::new(floorplan, config.engine, config.floorplan.path.clone());
    let app = routes::router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
}
