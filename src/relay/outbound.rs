//! Outbound request construction.
//!
//! # Responsibilities
//! - Address every upstream call to the configured target with GET
//! - Carry the caller's headers, overridden by the configured request headers
//! - Drop headers that belong to the inbound connection or body
//!
//! # Design Decisions
//! - The inbound method and body are not forwarded; the relay fetches a resource
//! - `host` is removed after merging so the transport derives it from the target

use axum::http::{header, HeaderMap, Method};
use url::Url;

use crate::relay::headers::strip_hop_by_hop;
use crate::relay::resolver::RelayConfig;

/// A fully prepared upstream fetch.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

/// Build the upstream request for one incoming request.
pub fn build_outbound(config: &RelayConfig, incoming: &HeaderMap) -> OutboundRequest {
    let mut headers = incoming.clone();

    strip_hop_by_hop(&mut headers);
    // No inbound body is sent upstream.
    headers.remove(header::CONTENT_LENGTH);

    config.request_overrides().apply(&mut headers);
    headers.remove(header::HOST);

    OutboundRequest {
        method: Method::GET,
        url: config.target().clone(),
        headers,
    }
}
