//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!     → routing::SiteRegistry (one routing scope per listen address)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Top-level sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::EdgeConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::VirtualHostConfig;
pub use validation::{ResolvedServer, ServerAction, ValidationError};
