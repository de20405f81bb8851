//! Virtual host registry.
//!
//! # Responsibilities
//! - Turn validated `[[servers]]` entries into immutable sites
//! - Group sites by listen address into per-listener routers

use std::sync::Arc;

use crate::config::schema::EdgeConfig;
use crate::config::validation::{validate_config, ResolvedServer, ServerAction};
use crate::config::ConfigError;
use crate::http::proxy::Upstream;
use crate::http::static_files::StaticFiles;
use crate::net::TlsFiles;
use crate::routing::matcher::DomainMatcher;
use crate::routing::router::HostRouter;

/// What a site does with the requests it accepts.
#[derive(Debug, Clone)]
pub enum SiteMode {
    /// Serve files from a directory.
    StaticRoot(StaticFiles),
    /// Forward to an upstream origin.
    ProxyPass(Upstream),
}

/// A validated virtual host.
#[derive(Debug)]
pub struct Site {
    pub name: String,
    pub listen: String,
    pub mode: SiteMode,
    pub tls: Option<TlsFiles>,
    matcher: DomainMatcher,
}

impl Site {
    pub fn new(
        name: impl Into<String>,
        listen: impl Into<String>,
        domains: Vec<String>,
        mode: SiteMode,
        tls: Option<TlsFiles>,
    ) -> Self {
        Self {
            name: name.into(),
            listen: listen.into(),
            mode,
            tls,
            matcher: DomainMatcher::new(domains),
        }
    }

    pub fn domains(&self) -> &[String] {
        self.matcher.domains()
    }

    /// Returns true if this site accepts the normalized `host`.
    pub fn serves(&self, host: &str) -> bool {
        self.matcher.matches(host)
    }
}

impl From<ResolvedServer> for Site {
    fn from(server: ResolvedServer) -> Self {
        let mode = match server.action {
            ServerAction::Root(root) => SiteMode::StaticRoot(StaticFiles::new(root)),
            ServerAction::Proxy(upstream) => SiteMode::ProxyPass(upstream),
        };
        Self::new(server.name, server.listen, server.domains, mode, server.tls)
    }
}

/// Ordered collection of every configured site.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: Vec<Arc<Site>>,
}

impl SiteRegistry {
    /// Validate the configuration and build the registry from it.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, ConfigError> {
        let sites = validate_config(config)
            .map_err(ConfigError::Validation)?
            .into_iter()
            .map(|server| Arc::new(Site::from(server)))
            .collect();

        Ok(Self { sites })
    }

    pub fn sites(&self) -> &[Arc<Site>] {
        &self.sites
    }

    /// One router per distinct listen address, in order of first appearance.
    pub fn listeners(&self) -> Vec<HostRouter> {
        let mut groups: Vec<(String, Vec<Arc<Site>>)> = Vec::new();
        for site in &self.sites {
            match groups.iter_mut().find(|(listen, _)| *listen == site.listen) {
                Some((_, sites)) => sites.push(Arc::clone(site)),
                None => groups.push((site.listen.clone(), vec![Arc::clone(site)])),
            }
        }

        groups
            .into_iter()
            .map(|(listen, sites)| HostRouter::new(listen, sites))
            .collect()
    }
}
