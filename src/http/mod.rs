//! HTTP host for resource relays.
//!
//! # Data Flow
//! ```text
//! ProxyConfig
//!     → server.rs (validate and resolve resources, build router)
//!
//! TCP connection
//!     → server.rs (Axum router, trace + timeout layers)
//!     → route_service(path) → HandleErrorLayer → ResourceProxy
//!     → Ok: relayed upstream response streamed to client
//!     → Err: 502 Bad Gateway written by the host error handler
//! ```

pub mod server;

pub use server::{shutdown_signal, HttpServer, ServerError};
