//! TCP listener binding.
//!
//! # Responsibilities
//! - Normalize configured listen addresses
//! - Bind one listener per distinct address
//! - Report bind failures per address without touching the others

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenError {
    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// TLS material could not be loaded for this address.
    #[error("failed to load TLS material for {address}: {source}")]
    Tls {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// Normalize a listen address into `host:port` form.
///
/// A bare `:port` binds every IPv4 interface. Returns `None` when the port is
/// missing or not a valid `u16`.
pub fn normalize_listen(listen: &str) -> Option<String> {
    let (host, port) = listen.rsplit_once(':')?;
    port.parse::<u16>().ok()?;

    if host.is_empty() {
        Some(format!("0.0.0.0:{port}"))
    } else if host.contains(':') && !host.starts_with('[') {
        // Unbracketed IPv6 is ambiguous with the port separator.
        None
    } else {
        Some(listen.to_string())
    }
}

/// Bind a TCP listener on a normalized listen address.
pub async fn bind(address: &str) -> Result<TcpListener, ListenError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenError::Bind {
            address: address.to_string(),
            source,
        })?;

    let local_addr: SocketAddr = listener.local_addr().map_err(|source| ListenError::Bind {
        address: address.to_string(),
        source,
    })?;

    tracing::info!(
        listen = %address,
        address = %local_addr,
        "Listener bound"
    );

    Ok(listener)
}
