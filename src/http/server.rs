//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create one ResourceProxy per configured resource
//! - Mount each proxy on its path behind the host error handler
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a listener with graceful shutdown

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::IntoResponse,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::validation::resolve_resources;
use crate::config::{ConfigError, ProxyConfig};
use crate::relay::{ConfigurationError, Fetch, HttpTransport, ResourceProxy, UpstreamConnectionError};

/// Errors raised while building the host.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relay(#[from] ConfigurationError),
}

/// HTTP host for configured resource relays.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Validate the config, resolve every resource and build the router.
    ///
    /// Mount paths the router would refuse are reported here as validation
    /// errors.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let resolved = resolve_resources(&config).map_err(ConfigError::Validation)?;

        let connect_timeout = Duration::from_secs(config.timeouts.connect_secs);
        // One client shared by all resources so connections are pooled.
        let transport: Arc<dyn Fetch> = Arc::new(
            HttpTransport::with_connect_timeout(Some(connect_timeout))
                .map_err(ConfigurationError::Transport)?,
        );

        let proxies = resolved
            .into_iter()
            .map(|(path, relay)| (path, ResourceProxy::from_parts(relay, transport.clone())))
            .collect();

        let router = Self::build_router(&config, proxies);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, proxies: Vec<(String, ResourceProxy)>) -> Router {
        let mut router = Router::new();
        for (path, proxy) in proxies {
            tracing::info!(
                path = %path,
                resource = %proxy.config().target(),
                "Mounting resource"
            );
            let service = ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_relay_error))
                .service(proxy);
            router = router.route_service(&path, service);
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` completes.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            resources = self.config.resources.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Host error path for relays that got no upstream response.
async fn handle_relay_error(err: UpstreamConnectionError) -> impl IntoResponse {
    tracing::error!(resource = %err.url(), error = %err, "Relay failed");
    (StatusCode::BAD_GATEWAY, "Upstream request failed")
}

/// Wait for shutdown signal (Ctrl+C).
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
