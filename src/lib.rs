//! Single-resource HTTP relay middleware.
//!
//! A [`ResourceProxy`] fetches one configured upstream resource for every
//! request it receives, merges header overrides in both directions and streams
//! the upstream body back to the caller. It is a [`tower::Service`], so it
//! mounts anywhere a tower-compatible host accepts one:
//!
//! ```rust,no_run
//! use axum::{error_handling::HandleErrorLayer, http::StatusCode, Router};
//! use resource_proxy::{ResourceProxy, UpstreamConnectionError};
//! use tower::ServiceBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logo = ResourceProxy::new(
//!     "https://cdn.example/logo",
//!     Some("image/png".into()),
//!     None,
//! )?;
//!
//! let app: Router = Router::new().route_service(
//!     "/logo.png",
//!     ServiceBuilder::new()
//!         .layer(HandleErrorLayer::new(|_: UpstreamConnectionError| async {
//!             StatusCode::BAD_GATEWAY
//!         }))
//!         .service(logo),
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod relay;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use relay::{
    ConfigurationError, HeaderBag, ResourceProxy, ResponseHeaders, Target, UpstreamConnectionError,
};
