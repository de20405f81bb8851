//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listen address (from config)
//!     → listener.rs (normalize, bind)
//!     → tls.rs (optional rustls termination)
//!     → Hand off to HTTP layer (one server per address)
//! ```
//!
//! # Design Decisions
//! - Each listen address is bound independently; one failure does not stop the rest
//! - TLS is optional and keyed by the site's certificate files

pub mod listener;
pub mod tls;

pub use listener::{bind, normalize_listen, ListenError};
pub use tls::TlsFiles;
