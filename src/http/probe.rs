//! Liveness probing
//!
//! A liveness probe only answers "is a process listening and answering
//! without an error status". It says nothing about whether the page renders.

use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::client::HttpClient;

/// Outcome of a single liveness check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeResult {
    Reachable { status: u16 },
    Unreachable { reason: String },
}

impl ProbeResult {
    #[cfg(test)]
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeResult::Reachable { .. })
    }

    /// Classify an HTTP status: [200, 400) is reachable
    pub fn from_status(status: u16) -> Self {
        if (200..400).contains(&status) {
            ProbeResult::Reachable { status }
        } else {
            ProbeResult::Unreachable {
                reason: format!("unexpected status {status}"),
            }
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Reachable { status } => write!(f, "reachable (status {status})"),
            ProbeResult::Unreachable { reason } => write!(f, "unreachable: {reason}"),
        }
    }
}

/// Network liveness capability
pub trait LivenessProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult;
}

/// Liveness probe backed by reqwest
#[derive(Default)]
pub struct HttpProbe {
    accept_invalid_certs: bool,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat targets with self-signed or expired certificates as reachable
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl LivenessProbe for HttpProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult {
        let client = match HttpClient::new(timeout, self.accept_invalid_certs) {
            Ok(client) => client,
            Err(e) => {
                return ProbeResult::Unreachable {
                    reason: e.to_string(),
                }
            }
        };

        match client.status(url).await {
            Ok(response) => {
                debug!(
                    "Liveness probe {} -> {} in {}ms",
                    url, response.status_code, response.duration_ms
                );
                if response.is_redirect() {
                    debug!("Redirects to {:?}", response.get_header("location"));
                }
                ProbeResult::from_status(response.status_code)
            }
            Err(e) => {
                debug!("Liveness probe {} failed: {}", url, e);
                ProbeResult::Unreachable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
