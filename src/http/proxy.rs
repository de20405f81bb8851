//! Request forwarding to an upstream origin.
//!
//! # Responsibilities
//! - Parse and hold the upstream base URL of a proxy site
//! - Rewrite the inbound target onto the upstream (path join, query merge)
//! - Execute the request through the shared pooled client
//! - Stream the upstream response back untouched
//!
//! # Design Decisions
//! - Bodies are moved, never buffered; the outbound request streams the inbound one
//! - One attempt per request, no retries
//! - Transport failures surface as 502 Bad Gateway

use axum::{
    body::Body,
    http::{
        header::{self, HeaderMap, HeaderValue},
        uri::{Authority, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;

use crate::http::response::stamp_server;

/// Pooled HTTP/HTTPS client shared by every proxy site.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Build the shared upstream client. `https` upstreams are verified against
/// the bundled webpki roots; `http` ones go over plain TCP.
pub fn build_client() -> UpstreamClient {
    let connector = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new()).build(connector)
}

/// Why an upstream URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamUrlError {
    #[error("{0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("invalid authority `{0}`")]
    InvalidAuthority(String),
}

/// Parsed upstream base URL of a proxy site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
    base_path: String,
    base_query: Option<String>,
}

impl Upstream {
    /// Parse an upstream base URL such as `http://127.0.0.1:3000/api`.
    pub fn parse(input: &str) -> Result<Self, UpstreamUrlError> {
        let url = Url::parse(input)?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(UpstreamUrlError::UnsupportedScheme(other.to_string())),
        };

        let host = url.host_str().ok_or(UpstreamUrlError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority = authority
            .parse::<Authority>()
            .map_err(|_| UpstreamUrlError::InvalidAuthority(authority.clone()))?;

        Ok(Self {
            scheme,
            authority,
            base_path: url.path().to_string(),
            base_query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
        })
    }

    /// Host (and port, when not default) sent to the upstream.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Rewrite an inbound request target onto this upstream.
    pub fn rewrite(&self, inbound: &Uri) -> Result<Uri, axum::http::Error> {
        let path = join_path(&self.base_path, inbound.path());
        let query = merge_query(self.base_query.as_deref(), inbound.query());

        let path_and_query = match query {
            Some(q) => format!("{path}?{q}"),
            None => path,
        };

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.base_path)?;
        if let Some(q) = &self.base_query {
            write!(f, "?{q}")?;
        }
        Ok(())
    }
}

/// Join two path segments so exactly one slash separates them.
pub fn join_path(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

/// Combine the upstream's own query with the inbound one, inbound bytes kept verbatim.
fn merge_query(base: Option<&str>, inbound: Option<&str>) -> Option<String> {
    let inbound = inbound.filter(|q| !q.is_empty());
    match (base, inbound) {
        (Some(b), Some(i)) => Some(format!("{b}&{i}")),
        (Some(b), None) => Some(b.to_string()),
        (None, Some(i)) => Some(i.to_string()),
        (None, None) => None,
    }
}

/// Drop the `close` token from `Connection`, keeping any other tokens.
fn clear_close_flag(headers: &mut HeaderMap) {
    let Some(value) = headers.get(header::CONNECTION) else {
        return;
    };
    let Ok(value) = value.to_str() else {
        return;
    };
    if !value.split(',').any(|t| t.trim().eq_ignore_ascii_case("close")) {
        return;
    }

    let kept = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("close"))
        .collect::<Vec<_>>()
        .join(", ");

    match HeaderValue::from_str(&kept) {
        Ok(v) if !kept.is_empty() => {
            headers.insert(header::CONNECTION, v);
        }
        _ => {
            headers.remove(header::CONNECTION);
        }
    }
}

/// Errors raised while forwarding a request upstream.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The rewritten target could not form a valid URI.
    #[error("invalid upstream target: {0}")]
    InvalidTarget(#[from] axum::http::Error),

    /// No connection could be established to the upstream.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] hyper_util::client::legacy::Error),

    /// The exchange with the upstream failed after connecting.
    #[error("upstream error: {0}")]
    UpstreamError(#[source] hyper_util::client::legacy::Error),
}

impl From<hyper_util::client::legacy::Error> for ProxyError {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        if e.is_connect() {
            ProxyError::UpstreamUnreachable(e)
        } else {
            ProxyError::UpstreamError(e)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
    }
}

/// Build the outbound request for `upstream` from an inbound request.
pub fn build_outbound(upstream: &Upstream, request: Request<Body>) -> Result<Request<Body>, ProxyError> {
    let (parts, body) = request.into_parts();
    let uri = upstream.rewrite(&parts.uri)?;

    let mut headers = parts.headers;
    headers.insert(
        header::HOST,
        HeaderValue::from_str(upstream.authority().as_str())
            .map_err(axum::http::Error::from)?,
    );
    clear_close_flag(&mut headers);

    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .version(Version::HTTP_11)
        .body(body)?;
    *outbound.headers_mut() = headers;

    Ok(outbound)
}

/// Forward a request to `upstream` and stream its response back.
pub async fn forward(
    client: &UpstreamClient,
    upstream: &Upstream,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let outbound = build_outbound(upstream, request)?;

    tracing::debug!(
        method = %outbound.method(),
        target = %outbound.uri(),
        "Forwarding request"
    );

    let response: Response<Incoming> = client.request(outbound).await?;

    let (mut parts, body) = response.into_parts();
    stamp_server(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}
