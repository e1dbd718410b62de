//! Resource relay subsystem.
//!
//! # Data Flow
//! ```text
//! construction (once):
//!     target + response/request header overrides
//!     → resolver.rs (validate, lowercase, compile)
//!     → RelayConfig (immutable, shared via Arc)
//!
//! per request:
//!     incoming Request
//!     → outbound.rs (GET target, merge request headers, drop host)
//!     → transport.rs (Fetch: hyper or reqwest client)
//!     → Ok:  response.rs (merge response headers, stream body)
//!     → Err: failure.rs (UpstreamConnectionError handed to the host's error path)
//! ```
//!
//! # Design Decisions
//! - All header validation happens at construction; requests never fail on config
//! - Exactly one upstream attempt per request
//! - The body is never buffered; hyper's flow control carries backpressure

pub mod failure;
pub mod headers;
pub mod outbound;
pub mod resolver;
pub mod response;
pub mod service;
pub mod transport;

use thiserror::Error;
use url::Url;

pub use headers::{HeaderBag, HeaderOverrides};
pub use outbound::OutboundRequest;
pub use resolver::{RelayConfig, ResponseHeaders, Target};
pub use service::{ResourceProxy, ResourceProxyBuilder};
pub use transport::{Fetch, FetchFuture, HttpTransport, HyperTransport};

/// Errors raised while constructing a [`ResourceProxy`].
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no target resource configured")]
    MissingTarget,

    #[error("target `{target}` is not a valid absolute URL")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("target `{target}` uses unsupported scheme `{scheme}` (expected http or https)")]
    UnsupportedScheme { target: String, scheme: String },

    #[error("invalid header name `{name}`")]
    InvalidHeaderName { name: String },

    #[error("invalid value for header `{name}`")]
    InvalidHeaderValue { name: String },

    #[error("failed to initialise the upstream HTTP client")]
    Transport(#[source] reqwest::Error),
}

/// Raised when no upstream response could be obtained.
///
/// The transport's error is kept intact and reachable through
/// [`std::error::Error::source`] or [`UpstreamConnectionError::into_source`].
#[derive(Debug, Error)]
#[error("upstream request to {url} failed")]
pub struct UpstreamConnectionError {
    url: Url,
    #[source]
    source: tower::BoxError,
}

impl UpstreamConnectionError {
    pub fn new(url: Url, source: impl Into<tower::BoxError>) -> Self {
        Self {
            url,
            source: source.into(),
        }
    }

    /// The target the failed request was addressed to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Take back the transport's original error.
    pub fn into_source(self) -> tower::BoxError {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::UnsupportedScheme {
            target: "ftp://files.example/a".into(),
            scheme: "ftp".into(),
        };
        assert!(err.to_string().contains("ftp"));

        let url = Url::parse("http://upstream.example/data").unwrap();
        let err = UpstreamConnectionError::new(url.clone(), "connection refused");
        assert_eq!(err.to_string(), "upstream request to http://upstream.example/data failed");
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
        assert_eq!(err.url(), &url);
    }
}
