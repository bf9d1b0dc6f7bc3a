//! xhr-fixture binary.
//!
//! Deterministic HTTP test fixture built with Tokio and Axum. Boots the
//! scenario server and runs until Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xhr_fixture::config::{self, FixtureConfig};
use xhr_fixture::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "xhr-fixture", about = "HTTP test fixture for client request libraries")]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xhr_fixture=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => FixtureConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        chunk_bytes = config.upload.chunk_bytes,
        slow_delay_ms = config.scenario.slow_delay_ms,
        "configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.trigger();
        }
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
