//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create one Axum Router per listen address
//! - Wire up middleware (tracing, Server header, optional timeout)
//! - Match the Host header to a site on this listener
//! - Dispatch to the static responder or the proxy forwarder
//! - Serve plain HTTP or TLS, with graceful shutdown

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    response::{IntoResponse, Response},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EdgeConfig;
use crate::http::proxy::{self, UpstreamClient};
use crate::http::response::{host_mismatch, server_header_value};
use crate::routing::matcher::request_host;
use crate::routing::{HostRouter, SiteMode};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<HostRouter>,
    pub client: UpstreamClient,
}

/// HTTP server for a single listen address.
pub struct HttpServer {
    router: Router,
    listen: String,
    tls: Option<RustlsConfig>,
    shutdown_grace: Duration,
}

impl HttpServer {
    /// Create a server for the sites of one listener.
    pub fn new(host_router: HostRouter, client: UpstreamClient, config: &EdgeConfig) -> Self {
        let listen = host_router.listen().to_string();
        let state = AppState {
            router: Arc::new(host_router),
            client,
        };

        Self {
            router: Self::build_router(config, state),
            listen,
            tls: None,
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }

    /// Terminate TLS on this listener.
    pub fn with_tls(mut self, tls: RustlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        let mut router = Router::new().fallback(dispatch).with_state(state);

        if let Some(secs) = config.listener.request_timeout_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::SERVER,
                server_header_value(),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            listen = %self.listen,
            address = %addr,
            tls = self.tls.is_some(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let grace = self.shutdown_grace;

        match self.tls {
            None => {
                let (fired_tx, fired_rx) = oneshot::channel();
                let signal = async move {
                    let _ = shutdown.recv().await;
                    let _ = fired_tx.send(());
                };
                let serve = axum::serve(listener, app)
                    .with_graceful_shutdown(signal)
                    .into_future();

                tokio::select! {
                    result = serve => result?,
                    _ = grace_elapsed(fired_rx, grace) => {
                        tracing::warn!(listen = %self.listen, "Grace period elapsed, dropping connections");
                    }
                }
            }
            Some(tls) => {
                let handle = Handle::new();
                let signal = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    signal.graceful_shutdown(Some(grace));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!(listen = %self.listen, "HTTP server stopped");
        Ok(())
    }
}

/// Resolves `grace` after the shutdown signal fired; never if it did not.
async fn grace_elapsed(fired: oneshot::Receiver<()>, grace: Duration) {
    match fired.await {
        Ok(()) => tokio::time::sleep(grace).await,
        Err(_) => std::future::pending().await,
    }
}

/// Entry point for every request on a listener.
/// Matches the host, then serves static files or proxies.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let host = request_host(&request).unwrap_or_default().to_string();

    let Some(site) = state.router.match_host(&host) else {
        tracing::warn!(
            listen = %state.router.listen(),
            host = %host,
            remote_addr = %remote_addr,
            headers = ?request.headers(),
            "No site for host"
        );
        return host_mismatch();
    };

    tracing::info!(
        site = %site.name,
        host = %host,
        remote_addr = %remote_addr,
        method = %request.method(),
        uri = %request.uri(),
        headers = ?request.headers(),
        "Request"
    );

    match &site.mode {
        SiteMode::StaticRoot(files) => files.serve(request).await,
        SiteMode::ProxyPass(upstream) => {
            match proxy::forward(&state.client, upstream, request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        site = %site.name,
                        upstream = %upstream,
                        error = %e,
                        detail = ?e,
                        "Proxy error"
                    );
                    e.into_response()
                }
            }
        }
    }
}
