//! Configuration for the standalone relay host.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, including each resource's target)
//!     → ProxyConfig (validated, immutable)
//!     → HttpServer builds one ResourceProxy per [[resources]] entry
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All host settings have defaults so a file may list only resources
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ProxyConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ResourceConfig;
pub use schema::TimeoutConfig;
