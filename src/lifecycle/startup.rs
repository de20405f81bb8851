//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the site registry from validated configuration
//! - Create the shared upstream client
//! - Bind one listener per listen address and start serving
//!
//! # Design Decisions
//! - Configuration errors are fatal and surface before anything binds
//! - A listener that fails to bind is logged and skipped; the rest keep serving
//! - Startup fails only when no listener could be started

use std::net::SocketAddr;

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use crate::config::{ConfigError, EdgeConfig};
use crate::http::{build_client, HttpServer};
use crate::lifecycle::Shutdown;
use crate::net::{self, tls::load_tls_config, ListenError};
use crate::routing::{HostRouter, SiteMode, SiteRegistry};

/// Error type for startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no listener could be started")]
    NoListeners,
}

/// Listeners that are up and serving.
#[derive(Debug)]
pub struct Running {
    addresses: Vec<(String, SocketAddr)>,
    servers: JoinSet<(String, std::io::Result<()>)>,
}

impl Running {
    /// Configured listen address and actual bound address of each listener.
    pub fn addresses(&self) -> &[(String, SocketAddr)] {
        &self.addresses
    }

    /// Wait for every listener to stop.
    pub async fn wait(mut self) {
        while let Some(joined) = self.servers.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((listen, Err(e))) => {
                    tracing::error!(listen = %listen, error = %e, "Listener stopped with error");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Listener task failed");
                }
            }
        }
    }
}

/// Start serving every site in `config`.
pub async fn start(config: &EdgeConfig, shutdown: &Shutdown) -> Result<Running, StartupError> {
    let registry = SiteRegistry::from_config(config)?;
    let client = build_client();

    let mut addresses = Vec::new();
    let mut servers = JoinSet::new();

    for host_router in registry.listeners() {
        log_sites(&host_router);

        let (listener, tls) = match prepare_listener(&host_router).await {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(listen = %host_router.listen(), error = %e, "Listener failed to start");
                continue;
            }
        };

        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(listen = %host_router.listen(), error = %e, "Listener has no local address");
                continue;
            }
        };

        let listen = host_router.listen().to_string();
        let mut server = HttpServer::new(host_router, client.clone(), config);
        if let Some(tls) = tls {
            server = server.with_tls(tls);
        }

        addresses.push((listen.clone(), local_addr));
        let server_shutdown = shutdown.subscribe();
        servers.spawn(async move { (listen, server.run(listener, server_shutdown).await) });
    }

    if addresses.is_empty() {
        return Err(StartupError::NoListeners);
    }

    Ok(Running { addresses, servers })
}

/// Load TLS material (if any) and bind the listener's address.
async fn prepare_listener(
    host_router: &HostRouter,
) -> Result<(TcpListener, Option<RustlsConfig>), ListenError> {
    let tls = match host_router.tls() {
        Some(files) => Some(load_tls_config(files).await.map_err(|source| ListenError::Tls {
            address: host_router.listen().to_string(),
            source,
        })?),
        None => None,
    };

    let listener = net::bind(host_router.listen()).await?;
    Ok((listener, tls))
}

fn log_sites(host_router: &HostRouter) {
    for site in host_router.sites() {
        match &site.mode {
            SiteMode::StaticRoot(files) => {
                tracing::info!(
                    site = %site.name,
                    listen = %site.listen,
                    domains = ?site.domains(),
                    root = %files.root().display(),
                    "Serving static directory"
                );
                if !files.root().is_dir() {
                    tracing::warn!(site = %site.name, root = %files.root().display(), "Static root is not a directory");
                }
            }
            SiteMode::ProxyPass(upstream) => {
                tracing::info!(
                    site = %site.name,
                    listen = %site.listen,
                    domains = ?site.domains(),
                    upstream = %upstream,
                    "Proxying to upstream"
                );
            }
        }
    }
}
