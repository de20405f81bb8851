//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resolve each server to exactly one action (static root or proxy)
//! - Validate listen addresses and upstream URLs before anything binds
//! - Detect conflicting domains on a shared listen address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<Vec<ResolvedServer>, Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::{EdgeConfig, VirtualHostConfig};
use crate::http::proxy::{Upstream, UpstreamUrlError};
use crate::net::listener::normalize_listen;
use crate::net::tls::TlsFiles;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no servers configured")]
    NoServers,

    #[error("server #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate server name `{0}`")]
    DuplicateName(String),

    #[error("server `{0}` has no domains")]
    NoDomains(String),

    #[error("server `{0}` has an empty domain entry")]
    EmptyDomain(String),

    #[error("server `{0}` must set exactly one of `root` or `proxy_pass`")]
    AmbiguousMode(String),

    #[error("server `{name}` has an invalid proxy_pass: {source}")]
    InvalidUpstream {
        name: String,
        source: UpstreamUrlError,
    },

    #[error("server `{name}` has an invalid listen address `{listen}`")]
    InvalidListen { name: String, listen: String },

    #[error("server `{0}` must set both `key_file` and `cert_file`, or neither")]
    PartialTls(String),

    #[error("domain `{domain}` on {listen} is claimed by both `{first}` and `{second}`")]
    DuplicateDomain {
        listen: String,
        domain: String,
        first: String,
        second: String,
    },

    #[error("servers `{first}` and `{second}` share {listen} but disagree on TLS files")]
    TlsMismatch {
        listen: String,
        first: String,
        second: String,
    },
}

/// What a server does with its requests, once `root`/`proxy_pass` are resolved.
#[derive(Debug, Clone)]
pub enum ServerAction {
    Root(PathBuf),
    Proxy(Upstream),
}

/// A server entry that passed validation, with its derived values.
#[derive(Debug, Clone)]
pub struct ResolvedServer {
    pub name: String,
    /// Normalized listen address (`:8080` becomes `0.0.0.0:8080`).
    pub listen: String,
    pub domains: Vec<String>,
    pub action: ServerAction,
    pub tls: Option<TlsFiles>,
}

/// Check the whole configuration, collecting every error found.
///
/// On success every server is returned resolved, in configuration order.
pub fn validate_config(config: &EdgeConfig) -> Result<Vec<ResolvedServer>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut resolved = Vec::with_capacity(config.servers.len());

    if config.servers.is_empty() {
        errors.push(ValidationError::NoServers);
    }

    let mut names = HashSet::new();
    for (index, server) in config.servers.iter().enumerate() {
        if server.name.is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !names.insert(server.name.as_str()) {
            errors.push(ValidationError::DuplicateName(server.name.clone()));
        }
        resolved.extend(validate_server(server, &mut errors));
    }

    validate_shared_listeners(&config.servers, &mut errors);

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(errors)
    }
}

fn validate_server(server: &VirtualHostConfig, errors: &mut Vec<ValidationError>) -> Option<ResolvedServer> {
    let before = errors.len();

    if server.domains.is_empty() {
        errors.push(ValidationError::NoDomains(server.name.clone()));
    } else if server.domains.iter().any(|d| d.is_empty()) {
        errors.push(ValidationError::EmptyDomain(server.name.clone()));
    }

    let action = match (&server.root, &server.proxy_pass) {
        (Some(root), None) => Some(ServerAction::Root(root.clone())),
        (None, Some(url)) => match Upstream::parse(url) {
            Ok(upstream) => Some(ServerAction::Proxy(upstream)),
            Err(source) => {
                errors.push(ValidationError::InvalidUpstream {
                    name: server.name.clone(),
                    source,
                });
                None
            }
        },
        _ => {
            errors.push(ValidationError::AmbiguousMode(server.name.clone()));
            None
        }
    };

    let listen = normalize_listen(&server.listen);
    if listen.is_none() {
        errors.push(ValidationError::InvalidListen {
            name: server.name.clone(),
            listen: server.listen.clone(),
        });
    }

    let tls = match (&server.cert_file, &server.key_file) {
        (Some(cert), Some(key)) => Some(TlsFiles {
            cert_path: cert.clone(),
            key_path: key.clone(),
        }),
        (None, None) => None,
        _ => {
            errors.push(ValidationError::PartialTls(server.name.clone()));
            None
        }
    };

    if errors.len() > before {
        return None;
    }

    Some(ResolvedServer {
        name: server.name.clone(),
        listen: listen?,
        domains: server.domains.clone(),
        action: action?,
        tls,
    })
}

/// Servers sharing one listen address form one routing scope: their domains
/// must be disjoint and they must agree on TLS material.
fn validate_shared_listeners(servers: &[VirtualHostConfig], errors: &mut Vec<ValidationError>) {
    let mut first_on_listen: HashMap<String, &VirtualHostConfig> = HashMap::new();
    let mut claimed: HashMap<(String, &str), &str> = HashMap::new();

    for server in servers {
        let Some(listen) = normalize_listen(&server.listen) else {
            continue;
        };

        for domain in &server.domains {
            match claimed.get(&(listen.clone(), domain.as_str())) {
                Some(first) if *first != server.name => {
                    errors.push(ValidationError::DuplicateDomain {
                        listen: listen.clone(),
                        domain: domain.clone(),
                        first: (*first).to_string(),
                        second: server.name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    claimed.insert((listen.clone(), domain.as_str()), server.name.as_str());
                }
            }
        }

        match first_on_listen.get(&listen) {
            Some(first) => {
                if first.key_file != server.key_file || first.cert_file != server.cert_file {
                    errors.push(ValidationError::TlsMismatch {
                        listen,
                        first: first.name.clone(),
                        second: server.name.clone(),
                    });
                }
            }
            None => {
                first_on_listen.insert(listen, server);
            }
        }
    }
}
