//! Response relay back to the caller.
//!
//! # Responsibilities
//! - Merge upstream headers with the configured response overrides
//! - Pass the upstream status and version through untouched
//! - Hand the upstream body to the caller as a stream
//!
//! # Design Decisions
//! - Configured headers always win over what upstream sent
//! - A body with no content type from either side is labelled
//!   `application/octet-stream`
//! - The body is moved, not read: frames are pulled only when the caller polls

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

use crate::relay::headers::strip_hop_by_hop;
use crate::relay::resolver::RelayConfig;

/// Content type used when neither upstream nor the overrides name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Statuses that never have a response body.
fn carries_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

/// Turn an upstream response into the caller's response.
pub fn relay_response(config: &RelayConfig, upstream: Response<Body>) -> Response<Body> {
    let (mut parts, body) = upstream.into_parts();

    strip_hop_by_hop(&mut parts.headers);
    config.response_overrides().apply(&mut parts.headers);

    if !parts.headers.contains_key(header::CONTENT_TYPE) && carries_body(parts.status) {
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        );
    }

    tracing::debug!(
        resource = %config.target(),
        status = %parts.status,
        "Relaying upstream response"
    );

    Response::from_parts(parts, body)
}
