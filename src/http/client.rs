//! HTTP client for liveness probing
//!
//! Thin wrapper over reqwest that classifies transport failures and never
//! follows redirects, so a 3xx is observed as-is.

use reqwest::{redirect::Policy, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0}ms")]
    Timeout(u128),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// HTTP client used by the liveness probe
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the given request timeout.
    ///
    /// Certificates are verified unless `accept_invalid_certs` is set, so a
    /// TLS failure surfaces as a request error.
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Send a GET request and return once the status line and headers arrive.
    ///
    /// The body is dropped unread; the timeout only covers the head.
    pub async fn status(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))?;

        debug!("Sending GET request to {}", parsed);
        let start = Instant::now();

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.to_string(), v.to_string()))
            })
            .collect();

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers,
            duration_ms,
        })
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> HttpError {
        if e.is_timeout() {
            HttpError::Timeout(self.timeout.as_millis())
        } else if e.is_connect() {
            HttpError::ConnectionRefused(url.to_string())
        } else {
            HttpError::RequestFailed(e.to_string())
        }
    }
}

/// Status line and headers of a response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status_code: u16) -> HttpResponse {
        HttpResponse {
            status_code,
            headers: HashMap::new(),
            duration_ms: 5,
        }
    }

    #[test]
    fn test_http_response_redirect_range() {
        assert!(!response(200).is_redirect());
        assert!(response(302).is_redirect());
        assert!(response(308).is_redirect());
        assert!(!response(404).is_redirect());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let client = HttpClient::new(Duration::from_millis(200), false).unwrap();
        let err = client.status("not a url").await.unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_redirect_not_followed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(302)
            .with_header("location", "/login")
            .create_async()
            .await;

        let client = HttpClient::new(Duration::from_secs(2), false).unwrap();
        let resp = client.status(&format!("{}/", server.url())).await.unwrap();

        assert_eq!(resp.status_code, 302);
        assert_eq!(resp.get_header("Location").map(String::as_str), Some("/login"));
    }
}
