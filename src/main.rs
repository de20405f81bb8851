//! vhost-edge
//!
//! A virtual-host edge server built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                    VHOST EDGE                     │
//!                         │                                                   │
//!   Client Request        │  ┌──────────┐    ┌──────────┐    ┌────────────┐   │
//!   ──────────────────────┼─▶│   net    │───▶│  http    │───▶│  routing   │   │
//!   (one listener per     │  │ listener │    │ dispatch │    │ host match │   │
//!    listen address)      │  └──────────┘    └──────────┘    └─────┬──────┘   │
//!                         │                                        │          │
//!                         │                         ┌──────────────┴───────┐  │
//!                         │                         ▼                      ▼  │
//!                         │                 ┌──────────────┐      ┌─────────┐ │
//!   Client Response       │                 │ static_files │      │  proxy  │─┼──▶ Upstream
//!   ◀─────────────────────┼─────────────────│  (ServeDir)  │      │ forward │◀┼─── Origin
//!                         │                 └──────────────┘      └─────────┘ │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vhost_edge::config::load_config;
use vhost_edge::lifecycle::{self, signals::shutdown_on_signal, Shutdown};
use vhost_edge::observability::logging;

#[derive(Parser)]
#[command(name = "vhost-edge")]
#[command(about = "Virtual-host edge server: static files or reverse proxy per domain", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "vhost-edge.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        println!(
            "{}: configuration OK ({} servers)",
            cli.config.display(),
            config.servers.len()
        );
        return ExitCode::SUCCESS;
    }

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        servers = config.servers.len(),
        "vhost-edge starting"
    );

    let shutdown = Shutdown::new();
    let running = match lifecycle::start(&config, &shutdown).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    tokio::spawn(shutdown_on_signal(shutdown));
    running.wait().await;

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
