//! Configuration schema definitions.
//!
//! This module defines the configuration file structure for the edge server.
//! All types derive Serde traits for deserialization from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default grace period for in-flight requests on shutdown.
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Root configuration for the edge server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Settings shared by every listener.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Seconds to wait for in-flight requests after a shutdown signal.
    pub shutdown_grace_secs: u64,

    /// Virtual host definitions, in priority order.
    pub servers: Vec<VirtualHostConfig>,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            observability: ObservabilityConfig::default(),
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            servers: Vec::new(),
        }
    }
}

/// Listener-wide settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Total time allowed per request. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,
}

/// One virtual host definition (`[[servers]]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VirtualHostConfig {
    /// Site identifier, used in logs.
    pub name: String,

    /// Address to listen on (e.g. "0.0.0.0:8080" or ":8080").
    pub listen: String,

    /// Accepted Host names (exact match).
    pub domains: Vec<String>,

    /// Directory to serve files from.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Upstream base URL to proxy to.
    #[serde(default)]
    pub proxy_pass: Option<String>,

    /// Private key file (PEM).
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Certificate chain file (PEM).
    #[serde(default)]
    pub cert_file: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
