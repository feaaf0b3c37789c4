//! Retry policy for the readiness gate

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("max_retries must be at least 1")]
    NoRetries,

    #[error("navigation timeout must be positive")]
    ZeroNavigationTimeout,

    #[error("probe timeout must be positive")]
    ZeroProbeTimeout,
}

/// Bounds for the readiness loop
///
/// The worst-case blocking time is roughly
/// `max_retries * (retry_delay + probe_timeout + navigation_timeout)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of attempts before giving up
    pub max_retries: u32,

    /// Pause between attempts
    pub retry_delay: Duration,

    /// Upper bound for any single browser wait
    pub navigation_timeout: Duration,

    /// Timeout of the HTTP liveness probe
    pub probe_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_delay: Duration::from_secs(5),
            navigation_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_retries == 0 {
            return Err(PolicyError::NoRetries);
        }
        if self.navigation_timeout.is_zero() {
            return Err(PolicyError::ZeroNavigationTimeout);
        }
        if self.probe_timeout.is_zero() {
            return Err(PolicyError::ZeroProbeTimeout);
        }
        Ok(())
    }
}
