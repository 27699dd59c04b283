//! places-gateway
//!
//! Serves place-search results from a single upstream, reshaped for clients,
//! cached in memory and bounded by a per-request timeout.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  GATEWAY                     │
//!     Client Request     │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!     ───────────────────┼─▶│  net   │──▶│   http   │──▶│orchestrator│  │
//!                        │  │listener│   │  server  │   │            │  │
//!                        │  └────────┘   └──────────┘   └─────┬──────┘  │
//!                        │                              hit   │  miss   │
//!                        │                         ┌──────────┴───┐     │
//!                        │                         ▼              ▼     │
//!                        │                   ┌─────────┐   ┌──────────┐ │
//!                        │                   │  cache  │◀──│ upstream │─┼──▶ Place API
//!                        │                   │  (LRU)  │   │ +places  │ │
//!                        │                   └─────────┘   └──────────┘ │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use places_gateway::config::load_config;
use places_gateway::lifecycle::Shutdown;
use places_gateway::observability::{logging, metrics};
use places_gateway::{net, HttpServer};

#[derive(Parser)]
#[command(name = "places-gateway")]
#[command(about = "Caching gateway for a place-search API", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        config_path = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        origin = %config.upstream.origin,
        cache_capacity = config.cache.capacity,
        request_timeout_ms = config.timeouts.request_ms,
        log_level = %config.observability.log_level,
        "places-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config.clone())?;
    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
