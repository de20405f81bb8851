//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host header, listener)
//!     → matcher.rs (normalize host, compare domains)
//!     → router.rs (per-listener site lookup)
//!     → Return: matched Site or NoMatch
//!
//! Site Compilation (at startup):
//!     VirtualHostConfig[]
//!     → registry.rs (validate, resolve static/proxy mode)
//!     → Group by listen address
//!     → Freeze as immutable HostRouter per listener
//! ```
//!
//! # Design Decisions
//! - Sites compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same site
//! - Explicit NoMatch rather than silent default

pub mod matcher;
pub mod registry;
pub mod router;

pub use registry::{Site, SiteMode, SiteRegistry};
pub use router::HostRouter;
