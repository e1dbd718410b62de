//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the relay host.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

use crate::relay::{HeaderBag, ResponseHeaders};

/// Root configuration for the relay host.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Resources to relay, one per mount path.
    pub resources: Vec<ResourceConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Host-side request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// A single relayed resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    /// Mount path on the host (e.g., "/feed").
    pub path: String,

    /// Absolute URL of the upstream resource.
    pub target: String,

    /// Either a content type or a table of response headers.
    #[serde(default)]
    pub response_headers: Option<ResponseHeaders>,

    /// Headers sent upstream in addition to the caller's.
    #[serde(default)]
    pub request_headers: Option<HeaderBag>,
}
