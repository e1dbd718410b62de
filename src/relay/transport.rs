//! Upstream HTTP transports.
//!
//! # Responsibilities
//! - Issue the prepared upstream fetch
//! - Resolve to either a transport error or a response with a streaming body
//!
//! # Design Decisions
//! - Connection pooling, TLS and timeouts belong to the client, not the relay
//! - Redirects are never followed; 3xx responses reach the caller as-is
//! - Environment proxy settings are ignored; the target is dialed directly
//! - Bodies are wrapped, never collected

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, Uri};
use futures_util::future::BoxFuture;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::relay::outbound::OutboundRequest;

/// Outcome of a single upstream fetch.
pub type FetchFuture = BoxFuture<'static, Result<Response<Body>, tower::BoxError>>;

/// The HTTP client capability the relay depends on.
pub trait Fetch: Send + Sync + 'static {
    /// Send `request` once. Errors mean no response was obtained.
    fn fetch(&self, request: OutboundRequest) -> FetchFuture;
}

/// reqwest-backed transport; speaks both http and https.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_connect_timeout(None)
    }

    /// Bound connection establishment; the body itself is never timed out here.
    pub fn with_connect_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetch for HttpTransport {
    fn fetch(&self, request: OutboundRequest) -> FetchFuture {
        let client = self.client.clone();
        Box::pin(async move {
            let response = client
                .request(request.method, request.url)
                .headers(request.headers)
                .send()
                .await?;

            let response: Response<reqwest::Body> = response.into();
            Ok::<_, tower::BoxError>(response.map(Body::new))
        })
    }
}

/// hyper-util legacy client transport; plain http only.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self::with_connect_timeout(None)
    }

    pub fn with_connect_timeout(timeout: Option<Duration>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(timeout);

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HyperTransport {
    fn fetch(&self, request: OutboundRequest) -> FetchFuture {
        let client = self.client.clone();
        Box::pin(async move {
            let uri: Uri = request.url.as_str().parse()?;
            let mut req = Request::builder()
                .method(request.method)
                .uri(uri)
                .body(Body::empty())?;
            *req.headers_mut() = request.headers;

            let response = client.request(req).await?;
            Ok::<_, tower::BoxError>(response.map(Body::new))
        })
    }
}
