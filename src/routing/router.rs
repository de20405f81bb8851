//! Per-listener site lookup.
//!
//! # Responsibilities
//! - Hold the sites bound to one listen address, in configuration order
//! - Resolve a Host header to at most one site
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - One router per listen address; no process-wide routing table
//! - First match wins; validation guarantees domains are disjoint anyway

use std::sync::Arc;

use crate::net::TlsFiles;
use crate::routing::matcher::normalize_host;
use crate::routing::registry::Site;

/// Routing scope of a single listener.
#[derive(Debug, Clone)]
pub struct HostRouter {
    listen: String,
    sites: Vec<Arc<Site>>,
}

impl HostRouter {
    pub fn new(listen: impl Into<String>, sites: Vec<Arc<Site>>) -> Self {
        Self {
            listen: listen.into(),
            sites,
        }
    }

    /// Normalized listen address this router serves.
    pub fn listen(&self) -> &str {
        &self.listen
    }

    pub fn sites(&self) -> &[Arc<Site>] {
        &self.sites
    }

    /// TLS material for the listener, shared by all its sites.
    pub fn tls(&self) -> Option<&TlsFiles> {
        self.sites.first().and_then(|s| s.tls.as_ref())
    }

    /// Select the site whose domains contain the host of `host_header`.
    pub fn match_host(&self, host_header: &str) -> Option<Arc<Site>> {
        let host = normalize_host(host_header)?;
        self.sites.iter().find(|site| site.serves(host)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::static_files::StaticFiles;
    use crate::routing::registry::SiteMode;

    fn site(name: &str, domains: &[&str]) -> Arc<Site> {
        Arc::new(Site::new(
            name,
            "0.0.0.0:8080",
            domains.iter().map(|d| d.to_string()).collect(),
            SiteMode::StaticRoot(StaticFiles::new("/srv/www")),
            None,
        ))
    }

    #[test]
    fn selects_the_site_owning_the_domain() {
        let router = HostRouter::new(
            "0.0.0.0:8080",
            vec![site("a", &["a.test"]), site("b", &["b.test", "www.b.test"])],
        );

        assert_eq!(router.match_host("a.test").unwrap().name, "a");
        assert_eq!(router.match_host("www.b.test:8080").unwrap().name, "b");
        assert!(router.match_host("c.test").is_none());
        assert!(router.match_host("").is_none());
    }

    #[test]
    fn first_site_in_order_wins() {
        let router = HostRouter::new(
            "0.0.0.0:8080",
            vec![site("first", &["dup.test"]), site("second", &["dup.test"])],
        );
        assert_eq!(router.match_host("dup.test").unwrap().name, "first");
    }
}
