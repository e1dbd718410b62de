//! Case-insensitive header bags.
//!
//! # Responsibilities
//! - Normalize caller-supplied header names to lowercase
//! - Merge two bags with override precedence
//! - Compile a bag into typed `HeaderName`/`HeaderValue` pairs once, at construction
//! - Strip connection-scoped (hop-by-hop) headers from working header maps
//!
//! # Design Decisions
//! - Later entries win when two names collapse to the same lowercase key
//! - Values are plain strings; anything else is rejected when deserializing

use std::collections::BTreeMap;
use std::fmt;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::relay::ConfigurationError;

/// Headers that describe a single connection and never cross the relay.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// A header map keyed by lowercase names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: BTreeMap<String, String>,
}

impl HeaderBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from arbitrary-case pairs.
    ///
    /// Pairs are applied in iteration order, so when `Content-Type` and
    /// `content-type` both appear the one yielded last is kept.
    pub fn normalize<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut bag = Self::new();
        for (name, value) in pairs {
            bag.insert(name, value);
        }
        bag
    }

    /// Insert a header, replacing any value stored under the same lowercase name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Case-insensitive removal.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Return a new bag holding `self` overridden by `overrides`.
    pub fn merge(&self, overrides: &HeaderBag) -> HeaderBag {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.insert(name, value);
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Validate every entry as an HTTP header.
    pub fn compile(&self) -> Result<HeaderOverrides, ConfigurationError> {
        let mut compiled = Vec::with_capacity(self.entries.len());
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ConfigurationError::InvalidHeaderName {
                    name: name.to_string(),
                }
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ConfigurationError::InvalidHeaderValue {
                    name: name.to_string(),
                }
            })?;
            compiled.push((header_name, header_value));
        }
        Ok(HeaderOverrides { entries: compiled })
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderBag
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::normalize(iter)
    }
}

impl<'de> Deserialize<'de> for HeaderBag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BagVisitor;

        impl<'de> Visitor<'de> for BagVisitor {
            type Value = HeaderBag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of header names to string values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<HeaderBag, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Document order is kept so later case variants win.
                let mut bag = HeaderBag::new();
                while let Some((name, value)) = map.next_entry::<String, String>()? {
                    bag.insert(name, value);
                }
                Ok(bag)
            }
        }

        deserializer.deserialize_map(BagVisitor)
    }
}

/// Typed, pre-validated override set derived from a [`HeaderBag`].
#[derive(Debug, Clone, Default)]
pub struct HeaderOverrides {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderOverrides {
    /// Write every override into `headers`, replacing all existing values
    /// for that name.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.entries {
            headers.insert(name.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Remove connection-scoped headers, including those named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(axum::http::header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}
