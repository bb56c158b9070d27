// BEI Listing Dashboard - Web Server
// REST API with Axum over the read-only listings table

use anyhow::{Context, Result};
use bei_dashboard::api::{build_router, AppState};
use bei_dashboard::{logging, Config, ListingRepository};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// 🌐 JSON API for the BEI listings dashboard
#[derive(Debug, Parser)]
#[command(name = "bei-server", version)]
struct Args {
    /// Tab-separated listings file (overrides BEI_DATA_PATH)
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Bind address (overrides BEI_SERVER_ADDR)
    #[arg(long, value_name = "HOST:PORT")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    logging::init("info,tower_http=debug");

    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(args.data, args.addr);
    tracing::info!(?config, "Configuration loaded");

    // Load once; every request shares the same immutable table
    let repo = ListingRepository::load(&config.data_path)?;
    let state = AppState {
        repo: Arc::new(repo),
        shares_bins: config.shares_bins,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    tracing::info!("🚀 Server running on http://{}", config.server_addr);
    tracing::info!("   API: http://{}/api/listings", config.server_addr);
    tracing::info!("   Summary: http://{}/api/summary", config.server_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
