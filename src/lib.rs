//! Virtual-host edge server library.
//!
//! Serves static directories or reverse-proxies to an upstream, selected per
//! request by the Host header and the listener it arrived on.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::SiteRegistry;
