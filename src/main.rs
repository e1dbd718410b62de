//! Standalone resource relay host.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │               RESOURCE PROXY                 │
//!     Client Request      │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!     ────────────────────┼─▶│  http  │──▶│ resolver │──▶│  outbound  │──┼──▶ Upstream
//!                         │  │ server │   │ (config) │   │  builder   │  │    Resource
//!                         │  └────────┘   └──────────┘   └────────────┘  │
//!     Client Response     │  ┌────────┐   ┌──────────┐                   │
//!     ◀───────────────────┼──│ header │◀──│ response │◀──────────────────┼─── (stream)
//!                         │  │ merge  │   │  relay   │                   │
//!                         │  └────────┘   └──────────┘                   │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use resource_proxy::config::load_config;
use resource_proxy::http::{shutdown_signal, HttpServer};
use resource_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "resource-proxy")]
#[command(about = "Relay upstream resources through a local HTTP listener", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind.to_string();
    }

    init_logging(&config.observability)?;

    tracing::info!("resource-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        resources = config.resources.len(),
        connect_timeout_secs = config.timeouts.connect_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_override_parsed_as_socket_addr() {
        let cli = Cli::try_parse_from(["resource-proxy", "-c", "proxy.toml", "-b", "127.0.0.1:9000"])
            .unwrap();
        assert_eq!(cli.bind, Some("127.0.0.1:9000".parse().unwrap()));
    }

    #[test]
    fn test_invalid_bind_override_rejected() {
        let result = Cli::try_parse_from(["resource-proxy", "-c", "proxy.toml", "--bind", "localhost"]);
        assert!(result.is_err());
    }
}
