//! The resource proxy as a tower service.
//!
//! A [`ResourceProxy`] answers every request by fetching its configured target.
//! Success yields the relayed upstream response; failure yields an
//! [`UpstreamConnectionError`] for the host to handle, e.g. with
//! `axum::error_handling::HandleErrorLayer`.

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::relay::failure::upstream_failed;
use crate::relay::headers::HeaderBag;
use crate::relay::outbound::build_outbound;
use crate::relay::resolver::{RelayConfig, ResponseHeaders, Target};
use crate::relay::response::relay_response;
use crate::relay::transport::{Fetch, HttpTransport};
use crate::relay::{ConfigurationError, UpstreamConnectionError};

/// Relays a single upstream resource to every caller.
#[derive(Clone)]
pub struct ResourceProxy {
    config: Arc<RelayConfig>,
    transport: Arc<dyn Fetch>,
}

impl ResourceProxy {
    /// Create a proxy for `target` using the default HTTP transport.
    ///
    /// A bare string for `response_headers` sets the `content-type` override.
    pub fn new(
        target: impl Into<Target>,
        response_headers: Option<ResponseHeaders>,
        request_headers: Option<HeaderBag>,
    ) -> Result<Self, ConfigurationError> {
        let mut builder = Self::builder().target(target);
        if let Some(response_headers) = response_headers {
            builder = builder.response_headers(response_headers);
        }
        if let Some(request_headers) = request_headers {
            builder = builder.request_headers(request_headers);
        }
        builder.build()
    }

    pub fn builder() -> ResourceProxyBuilder {
        ResourceProxyBuilder::default()
    }

    /// Create a proxy from an already resolved configuration.
    pub fn from_parts(config: RelayConfig, transport: Arc<dyn Fetch>) -> Self {
        tracing::debug!(
            resource = %config.target(),
            content_type = config.response_headers().get("content-type").unwrap_or("<upstream>"),
            response_overrides = config.response_headers().len(),
            request_overrides = config.request_headers().len(),
            "Resource proxy ready"
        );
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relay one request. The inbound method and body are ignored.
    pub async fn relay<B>(&self, request: Request<B>) -> Result<Response<Body>, UpstreamConnectionError> {
        dispatch(self.config.clone(), self.transport.clone(), request).await
    }
}

impl fmt::Debug for ResourceProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceProxy")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn dispatch<B>(
    config: Arc<RelayConfig>,
    transport: Arc<dyn Fetch>,
    request: Request<B>,
) -> BoxFuture<'static, Result<Response<Body>, UpstreamConnectionError>> {
    // Only the head is needed; the inbound body is dropped here.
    let (parts, _) = request.into_parts();

    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        resource = %config.target(),
        "Fetching resource"
    );

    let outbound = build_outbound(&config, &parts.headers);
    let pending = transport.fetch(outbound);

    Box::pin(async move {
        match pending.await {
            Ok(upstream) => Ok(relay_response(&config, upstream)),
            Err(e) => Err(upstream_failed(config.target(), e)),
        }
    })
}

impl<B> Service<Request<B>> for ResourceProxy {
    type Response = Response<Body>;
    type Error = UpstreamConnectionError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        dispatch(self.config.clone(), self.transport.clone(), request)
    }
}

/// Step-by-step construction of a [`ResourceProxy`].
#[derive(Default)]
pub struct ResourceProxyBuilder {
    target: Option<Target>,
    response_headers: Option<ResponseHeaders>,
    request_headers: Option<HeaderBag>,
    transport: Option<Arc<dyn Fetch>>,
}

impl ResourceProxyBuilder {
    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn response_headers(mut self, headers: impl Into<ResponseHeaders>) -> Self {
        self.response_headers = Some(headers.into());
        self
    }

    pub fn request_headers(mut self, headers: HeaderBag) -> Self {
        self.request_headers = Some(headers);
        self
    }

    /// Use a specific transport instead of the default reqwest client.
    pub fn transport(mut self, transport: impl Fetch) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<ResourceProxy, ConfigurationError> {
        let config = RelayConfig::resolve(self.target, self.response_headers, self.request_headers)?;
        let transport: Arc<dyn Fetch> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new().map_err(ConfigurationError::Transport)?),
        };
        Ok(ResourceProxy::from_parts(config, transport))
    }
}
