//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay + host produce:
//!     → tracing events (structured fields: resource, status, error)
//!     → tower_http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, human or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - RUST_LOG overrides the configured level

pub mod logging;

pub use logging::init_logging;
