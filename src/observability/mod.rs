//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: site, host, remote_addr, ...)
//!     → tower-http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```
//!
//! # Design Decisions
//! - Every request yields one dispatch record (info on match, warn on rejection)
//! - Proxy failures are logged at error level with the full error chain

pub mod logging;
