//! Target application model
//!
//! Defines the validated base URL every probe and test case is built from.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Base URL validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid base URL '{url}': {reason}")]
    Invalid { url: String, reason: String },

    #[error("Unsupported scheme '{0}': base URL must be http or https")]
    UnsupportedScheme(String),

    #[error("Base URL '{0}' has no host")]
    MissingHost(String),
}

/// Absolute HTTP(S) URL of the application under test
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse and validate a base URL
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let url = Url::parse(input.trim()).map_err(|e| TargetError::Invalid {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(TargetError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map(str::is_empty).unwrap_or(true) {
            return Err(TargetError::MissingHost(input.to_string()));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Build the URL for a route path, keeping any path prefix of the base
    pub fn route(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.0.as_str().trim_end_matches('/');
        if path.is_empty() || path == "/" {
            format!("{base}/")
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// `host:port` as it appears in the browser's address bar
    pub fn authority(&self) -> String {
        let host = self.0.host_str().unwrap_or_default();
        match self.0.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BaseUrl::parse(&value)
    }
}

impl From<BaseUrl> for String {
    fn from(value: BaseUrl) -> Self {
        value.0.into()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let url = BaseUrl::parse("http://localhost:3000/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/");
        assert_eq!(url.authority(), "localhost:3000");
    }

    #[test]
    fn test_parse_rejects_non_http() {
        assert!(matches!(
            BaseUrl::parse("ftp://example.com/"),
            Err(TargetError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            BaseUrl::parse("localhost:3000"),
            Err(TargetError::UnsupportedScheme(_)) | Err(TargetError::Invalid { .. })
        ));
        assert!(matches!(
            BaseUrl::parse("/products"),
            Err(TargetError::Invalid { .. })
        ));
    }

    #[test]
    fn test_route_joining() {
        let url = BaseUrl::parse("http://localhost:3000/").unwrap();
        assert_eq!(url.route("/"), "http://localhost:3000/");
        assert_eq!(url.route("/products"), "http://localhost:3000/products");
        assert_eq!(url.route("login"), "http://localhost:3000/login");

        let prefixed = BaseUrl::parse("https://shop.example.com/app/").unwrap();
        assert_eq!(prefixed.route("/cart"), "https://shop.example.com/app/cart");
        assert_eq!(prefixed.authority(), "shop.example.com");
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let url: BaseUrl = serde_json::from_str("\"http://frontend:3000\"").unwrap();
        assert_eq!(url.authority(), "frontend:3000");
        assert!(serde_json::from_str::<BaseUrl>("\"mailto:a@b.c\"").is_err());
    }
}
