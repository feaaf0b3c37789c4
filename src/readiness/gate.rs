//! Readiness gate
//!
//! Polls the target until it is both reachable over HTTP and able to render
//! a document with a non-empty title in the browser.

use std::fmt;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::RetryPolicy;
use crate::browser::{BrowserError, BrowserSession, BODY_SELECTOR};
use crate::http::{LivenessProbe, ProbeResult};
use crate::models::BaseUrl;

/// Caller-supplied cancellation check, consulted before every attempt
pub type CancelCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// Terminal result of the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadinessOutcome {
    Ready { title: String, attempts: u32 },
    Exhausted { last_error: String, attempts: u32 },
    Cancelled { attempts: u32 },
}

impl ReadinessOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessOutcome::Ready { .. })
    }

    /// Attempts consumed before reaching this outcome
    pub fn attempts(&self) -> u32 {
        match self {
            ReadinessOutcome::Ready { attempts, .. }
            | ReadinessOutcome::Exhausted { attempts, .. }
            | ReadinessOutcome::Cancelled { attempts } => *attempts,
        }
    }
}

impl fmt::Display for ReadinessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessOutcome::Ready { title, attempts } => {
                write!(f, "ready after {attempts} attempt(s), title {title:?}")
            }
            ReadinessOutcome::Exhausted {
                last_error,
                attempts,
            } => write!(f, "not ready after {attempts} attempt(s): {last_error}"),
            ReadinessOutcome::Cancelled { attempts } => {
                write!(f, "cancelled after {attempts} attempt(s)")
            }
        }
    }
}

/// Why a render probe did not succeed
#[derive(Error, Debug)]
enum RenderFailure {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("page rendered with an empty title")]
    EmptyTitle,
}

/// Retry loop deciding when the application is safe to test
pub struct ReadinessGate<P> {
    probe: P,
    policy: RetryPolicy,
    cancel: Option<CancelCheck>,
}

impl<P: LivenessProbe> ReadinessGate<P> {
    pub fn new(probe: P, policy: RetryPolicy) -> Self {
        Self {
            probe,
            policy,
            cancel: None,
        }
    }

    /// Abort between attempts once `check` returns true
    pub fn with_cancel_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.cancel = Some(Box::new(check));
        self
    }

    #[cfg(test)]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Block until the target is ready or the retry budget is spent.
    ///
    /// Every call starts from attempt 1. No sleep follows the final attempt.
    pub async fn wait_until_ready<S: BrowserSession>(
        &self,
        session: &S,
        base_url: &BaseUrl,
    ) -> ReadinessOutcome {
        let max = self.policy.max_retries.max(1);
        let url = base_url.as_str();
        let mut last_error = String::from("no attempt completed");

        info!(
            "Waiting for {} to become ready ({} attempts, {}ms apart)",
            url,
            max,
            self.policy.retry_delay.as_millis()
        );

        for attempt in 1..=max {
            if self.is_cancelled() {
                info!("Readiness wait cancelled before attempt {}", attempt);
                return ReadinessOutcome::Cancelled {
                    attempts: attempt - 1,
                };
            }

            match self.probe.probe(url, self.policy.probe_timeout).await {
                ProbeResult::Unreachable { reason } => {
                    warn!(
                        "Server not responding, retrying ({}/{}): {}",
                        attempt, max, reason
                    );
                    last_error = format!("server unreachable: {reason}");
                }
                ProbeResult::Reachable { status } => {
                    debug!("Liveness probe returned {}, checking render", status);
                    match self.render_probe(session, url).await {
                        Ok(title) => {
                            info!("Application ready after {} attempt(s): {:?}", attempt, title);
                            return ReadinessOutcome::Ready {
                                title,
                                attempts: attempt,
                            };
                        }
                        Err(e) => {
                            warn!("App not ready, retrying ({}/{}): {}", attempt, max, e);
                            last_error = e.to_string();
                        }
                    }
                }
            }

            if attempt < max && !self.policy.retry_delay.is_zero() {
                sleep(self.policy.retry_delay).await;
            }
        }

        ReadinessOutcome::Exhausted {
            last_error,
            attempts: max,
        }
    }

    async fn render_probe<S: BrowserSession>(
        &self,
        session: &S,
        url: &str,
    ) -> Result<String, RenderFailure> {
        session.navigate(url).await?;
        session
            .wait_for_element(BODY_SELECTOR, self.policy.navigation_timeout)
            .await?;

        let title = session.title().await?;
        if title.is_empty() {
            return Err(RenderFailure::EmptyTitle);
        }
        Ok(title)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|check| check()).unwrap_or(false)
    }
}
