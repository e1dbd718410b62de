//! Construction-time resolution of relay settings.
//!
//! # Responsibilities
//! - Parse and validate the target resource URL (absolute, http or https)
//! - Expand the content-type shorthand for response headers
//! - Normalize and compile both header override sets
//!
//! # Design Decisions
//! - Runs once per proxy; the result is immutable and shared read-only
//! - Every failure is a [`ConfigurationError`]; nothing here touches the network

use url::Url;

use crate::relay::headers::{HeaderBag, HeaderOverrides};
use crate::relay::ConfigurationError;

/// The upstream resource, either as written by the caller or already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Raw(String),
    Url(Url),
}

impl From<&str> for Target {
    fn from(raw: &str) -> Self {
        Target::Raw(raw.to_string())
    }
}

impl From<String> for Target {
    fn from(raw: String) -> Self {
        Target::Raw(raw)
    }
}

impl From<Url> for Target {
    fn from(url: Url) -> Self {
        Target::Url(url)
    }
}

impl From<&Url> for Target {
    fn from(url: &Url) -> Self {
        Target::Url(url.clone())
    }
}

impl Target {
    fn resolve(self) -> Result<Url, ConfigurationError> {
        let url = match self {
            Target::Url(url) => url,
            Target::Raw(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ConfigurationError::MissingTarget);
                }
                Url::parse(trimmed).map_err(|source| ConfigurationError::InvalidTarget {
                    target: raw.clone(),
                    source,
                })?
            }
        };

        // http(s) URLs without a host never parse, so the scheme check is enough.
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigurationError::UnsupportedScheme {
                target: url.to_string(),
                scheme: other.to_string(),
            }),
        }
    }
}

/// Response header overrides: a bare content type or a full header map.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum ResponseHeaders {
    ContentType(String),
    Map(HeaderBag),
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        ResponseHeaders::Map(HeaderBag::new())
    }
}

impl From<&str> for ResponseHeaders {
    fn from(content_type: &str) -> Self {
        ResponseHeaders::ContentType(content_type.to_string())
    }
}

impl From<String> for ResponseHeaders {
    fn from(content_type: String) -> Self {
        ResponseHeaders::ContentType(content_type)
    }
}

impl From<HeaderBag> for ResponseHeaders {
    fn from(bag: HeaderBag) -> Self {
        ResponseHeaders::Map(bag)
    }
}

impl ResponseHeaders {
    /// Collapse to the canonical lowercase map.
    pub fn into_bag(self) -> HeaderBag {
        match self {
            ResponseHeaders::ContentType(content_type) => {
                HeaderBag::normalize([("content-type", content_type)])
            }
            ResponseHeaders::Map(bag) => bag,
        }
    }
}

/// Canonical, validated relay settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    target: Url,
    response_headers: HeaderBag,
    request_headers: HeaderBag,
    response_overrides: HeaderOverrides,
    request_overrides: HeaderOverrides,
}

impl RelayConfig {
    /// Validate and normalize the three construction inputs.
    pub fn resolve(
        target: Option<Target>,
        response_headers: Option<ResponseHeaders>,
        request_headers: Option<HeaderBag>,
    ) -> Result<Self, ConfigurationError> {
        let target = target.ok_or(ConfigurationError::MissingTarget)?.resolve()?;
        let response_headers = response_headers.unwrap_or_default().into_bag();
        let request_headers = request_headers.unwrap_or_default();

        let response_overrides = response_headers.compile()?;
        let request_overrides = request_headers.compile()?;

        Ok(Self {
            target,
            response_headers,
            request_headers,
            response_overrides,
            request_overrides,
        })
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Normalized response header overrides.
    pub fn response_headers(&self) -> &HeaderBag {
        &self.response_headers
    }

    /// Normalized request header overrides.
    pub fn request_headers(&self) -> &HeaderBag {
        &self.request_headers
    }

    pub(crate) fn response_overrides(&self) -> &HeaderOverrides {
        &self.response_overrides
    }

    pub(crate) fn request_overrides(&self) -> &HeaderOverrides {
        &self.request_overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(target: &str) -> Result<RelayConfig, ConfigurationError> {
        RelayConfig::resolve(Some(target.into()), None, None)
    }

    #[test]
    fn test_missing_target() {
        let err = RelayConfig::resolve(None, None, None).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingTarget));
    }

    #[test]
    fn test_empty_target() {
        assert!(matches!(resolve("").unwrap_err(), ConfigurationError::MissingTarget));
        assert!(matches!(resolve("   ").unwrap_err(), ConfigurationError::MissingTarget));
    }

    #[test]
    fn test_relative_target_rejected() {
        let err = resolve("/data.json").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTarget { .. }));
    }

    #[test]
    fn test_hostless_target_rejected() {
        for target in ["http://", "https://"] {
            let err = resolve(target).unwrap_err();
            assert!(matches!(err, ConfigurationError::InvalidTarget { .. }));
        }
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let err = resolve("mailto:ops@upstream.example").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_structured_target_accepted() {
        let url = Url::parse("https://upstream.example/feed?page=2").unwrap();
        let config = RelayConfig::resolve(Some(url.clone().into()), None, None).unwrap();
        assert_eq!(config.target(), &url);
    }

    #[test]
    fn test_content_type_shorthand() {
        let config = RelayConfig::resolve(
            Some("http://upstream.example/data".into()),
            Some("text/plain".into()),
            None,
        )
        .unwrap();

        let expected = HeaderBag::normalize([("content-type", "text/plain")]);
        assert_eq!(config.response_headers(), &expected);
    }

    #[test]
    fn test_absent_headers_default_to_empty() {
        let config = resolve("http://upstream.example/data").unwrap();
        assert!(config.response_headers().is_empty());
        assert!(config.request_headers().is_empty());
        assert!(config.response_overrides().is_empty());
    }

    #[test]
    fn test_header_maps_normalized() {
        let config = RelayConfig::resolve(
            Some("http://upstream.example/data".into()),
            Some(HeaderBag::normalize([("Cache-Control", "no-store"), ("CACHE-CONTROL", "max-age=60")]).into()),
            Some(HeaderBag::normalize([("X-Api-Key", "k1")])),
        )
        .unwrap();

        assert_eq!(config.response_headers().len(), 1);
        assert_eq!(config.response_headers().get("cache-control"), Some("max-age=60"));
        assert_eq!(config.request_headers().get("x-api-key"), Some("k1"));
    }

    #[test]
    fn test_invalid_override_fails_construction() {
        let err = RelayConfig::resolve(
            Some("http://upstream.example/data".into()),
            Some("text/plain\r\nx-injected: 1".into()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidHeaderValue { .. }));
    }

    #[test]
    fn test_response_headers_deserialize_both_forms() {
        #[derive(serde::Deserialize)]
        struct Section {
            response_headers: ResponseHeaders,
        }

        let short: Section = toml::from_str("response_headers = \"image/png\"").unwrap();
        assert_eq!(short.response_headers, ResponseHeaders::ContentType("image/png".into()));

        let map: Section =
            toml::from_str("[response_headers]\n\"Content-Type\" = \"image/png\"").unwrap();
        assert_eq!(
            map.response_headers.into_bag().get("content-type"),
            Some("image/png")
        );
    }
}
