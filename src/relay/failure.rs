//! Failure relay.
//!
//! An upstream call that produced no response becomes an
//! [`UpstreamConnectionError`] returned from the service. The relay never
//! writes a status or body on this path; the host's error handling does.

use url::Url;

use crate::relay::UpstreamConnectionError;

/// Wrap a transport failure for the host, logging it once.
pub fn upstream_failed(url: &Url, source: tower::BoxError) -> UpstreamConnectionError {
    tracing::warn!(resource = %url, error = %source, "Upstream request failed");
    UpstreamConnectionError::new(url.clone(), source)
}
