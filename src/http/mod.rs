//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, host dispatch)
//!     → routing layer picks the site for the Host header
//!     → static_files.rs (ServeDir on the site root)
//!       or proxy.rs (rewrite, forward, stream back)
//!     → response.rs (Server header, rejection)
//!     → Send to client
//! ```

pub mod proxy;
pub mod response;
pub mod server;
pub mod static_files;

pub use proxy::{build_client, ProxyError, Upstream, UpstreamClient};
pub use server::HttpServer;
