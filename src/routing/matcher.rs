//! Host header matching logic.
//!
//! # Responsibilities
//! - Extract the requested host (Host header, or URI authority for HTTP/2)
//! - Split host from port, honouring bracketed IPv6 literals
//! - Match the host component exactly against a site's domains
//!
//! # Design Decisions
//! - Domains are compared exactly as configured (case-sensitive)
//! - The port is validated but not compared; the listener already fixes it
//! - No wildcard or subdomain matching

use axum::http::{header, Request};

/// Host requested by the client, before normalization.
pub fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
}

/// Reduce a Host value to its host component.
///
/// Returns `None` for empty values, malformed ports, and unbracketed IPv6.
pub fn normalize_host(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(rest) = value.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        if host.is_empty() {
            return None;
        }
        return match tail {
            "" => Some(host),
            _ => tail.strip_prefix(':').filter(|p| valid_port(p)).map(|_| host),
        };
    }

    match value.rsplit_once(':') {
        Some((host, _)) if host.is_empty() || host.contains(':') => None,
        Some((host, port)) => valid_port(port).then_some(host),
        None => Some(value),
    }
}

fn valid_port(port: &str) -> bool {
    port.is_empty() || port.parse::<u16>().is_ok()
}

/// Matches a normalized host against a fixed set of domains.
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    domains: Vec<String>,
}

impl DomainMatcher {
    pub fn new(domains: Vec<String>) -> Self {
        Self { domains }
    }

    /// Returns true if `host` is one of the configured domains.
    pub fn matches(&self, host: &str) -> bool {
        self.domains.iter().any(|d| d == host)
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn strips_port_from_host() {
        assert_eq!(normalize_host("example.com:8080"), Some("example.com"));
        assert_eq!(normalize_host("example.com"), Some("example.com"));
        assert_eq!(normalize_host("example.com:"), Some("example.com"));
        assert_eq!(normalize_host("127.0.0.1:80"), Some("127.0.0.1"));
    }

    #[test]
    fn handles_ipv6_literals() {
        assert_eq!(normalize_host("[::1]:8080"), Some("::1"));
        assert_eq!(normalize_host("[::1]"), Some("::1"));
        assert_eq!(normalize_host("::1"), None);
        assert_eq!(normalize_host("[]:80"), None);
        assert_eq!(normalize_host("[::1]x"), None);
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(normalize_host(""), None);
        assert_eq!(normalize_host(":8080"), None);
        assert_eq!(normalize_host("example.com:http"), None);
        assert_eq!(normalize_host("example.com:99999"), None);
    }

    #[test]
    fn domain_match_is_exact() {
        let matcher = DomainMatcher::new(vec!["example.com".into(), "www.example.com".into()]);
        assert!(matcher.matches("example.com"));
        assert!(matcher.matches("www.example.com"));
        assert!(!matcher.matches("api.example.com"));
        assert!(!matcher.matches("EXAMPLE.COM"));
        assert!(!matcher.matches("example.com."));
    }

    #[test]
    fn request_host_prefers_header_then_authority() {
        let req = Request::builder()
            .uri("http://authority.test/path")
            .header("Host", "header.test:8080")
            .body(Body::default())
            .unwrap();
        assert_eq!(request_host(&req), Some("header.test:8080"));

        let req = Request::builder()
            .uri("http://authority.test/path")
            .body(Body::default())
            .unwrap();
        assert_eq!(request_host(&req), Some("authority.test"));

        let req = Request::builder().uri("/path").body(Body::default()).unwrap();
        assert_eq!(request_host(&req), None);
    }
}
