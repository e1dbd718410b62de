//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check mount paths are literal and unique
//! - Resolve every resource so bad targets and headers fail at load time
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::relay::{ConfigurationError, RelayConfig};

/// A single semantic problem in a [`ProxyConfig`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no resources configured")]
    NoResources,

    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("mount path `{0}` must start with `/` and contain no route parameters")]
    InvalidPath(String),

    #[error("mount path `{0}` is used more than once")]
    DuplicatePath(String),

    #[error("resource `{path}`: {source}")]
    Resource {
        path: String,
        #[source]
        source: ConfigurationError,
    },
}

/// Check `config`, reporting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    resolve_resources(config).map(|_| ())
}

/// Validate `config` and return each mount path with its resolved relay.
pub fn resolve_resources(config: &ProxyConfig) -> Result<Vec<(String, RelayConfig)>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut resolved = Vec::with_capacity(config.resources.len());

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.resources.is_empty() {
        errors.push(ValidationError::NoResources);
    }

    let mut seen = HashSet::new();
    for resource in &config.resources {
        let path = &resource.path;
        if !is_literal_path(path) {
            errors.push(ValidationError::InvalidPath(path.clone()));
        } else if !seen.insert(path.as_str()) {
            errors.push(ValidationError::DuplicatePath(path.clone()));
        }

        match RelayConfig::resolve(
            Some(resource.target.as_str().into()),
            resource.response_headers.clone(),
            resource.request_headers.clone(),
        ) {
            Ok(relay) => resolved.push((path.clone(), relay)),
            Err(source) => errors.push(ValidationError::Resource {
                path: path.clone(),
                source,
            }),
        }
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(errors)
    }
}

/// A path the router accepts as a plain route: rooted, with no captures or wildcards.
fn is_literal_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains(['{', '}', '*'])
        && !path.split('/').any(|segment| segment.starts_with(':'))
}
