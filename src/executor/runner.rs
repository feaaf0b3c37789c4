//! Suite runner
//!
//! Owns the suite lifecycle: acquire the browser session, gate on readiness,
//! run every case in order against the shared session, release the session.

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::browser::{BrowserError, BrowserSession, SessionFactory};
use crate::checks::{self, CheckContext};
use crate::http::LivenessProbe;
use crate::models::{BaseUrl, CheckOutcome, RunSummary, TestCase, TestResult};
use crate::readiness::{ReadinessGate, ReadinessOutcome};
use crate::utils::Stopwatch;

/// Fatal errors that stop the suite before any case runs
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to start browser session: {0}")]
    SessionStart(#[source] BrowserError),

    #[error("Application not reachable after {attempts} attempt(s): {last_error}")]
    ReadinessExhausted { attempts: u32, last_error: String },

    #[error("Readiness wait cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

/// Sequential runner for an ordered set of test cases
pub struct SuiteRunner {
    base_url: BaseUrl,
    cases: Vec<TestCase>,
    wait_timeout: Duration,
}

impl SuiteRunner {
    pub fn new(base_url: BaseUrl, cases: Vec<TestCase>) -> Self {
        Self {
            base_url,
            cases,
            wait_timeout: Duration::from_secs(10),
        }
    }

    /// Bound for each case's stabilizing wait
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Run the whole suite.
    ///
    /// Only setup failures are returned as errors; individual case failures
    /// are folded into the summary. The session is released on every path.
    pub async fn run<P, F>(
        &self,
        gate: &ReadinessGate<P>,
        factory: &F,
    ) -> Result<RunSummary, RunError>
    where
        P: LivenessProbe,
        F: SessionFactory,
    {
        let session = factory.create().await.map_err(RunError::SessionStart)?;

        let result = match gate.wait_until_ready(&session, &self.base_url).await {
            ReadinessOutcome::Ready { title, attempts } => {
                info!(
                    "{} is up ({:?}, {} attempt(s)), running {} case(s)",
                    self.base_url,
                    title,
                    attempts,
                    self.cases.len()
                );
                Ok(self.execute(&session).await)
            }
            ReadinessOutcome::Exhausted {
                attempts,
                last_error,
            } => Err(RunError::ReadinessExhausted {
                attempts,
                last_error,
            }),
            ReadinessOutcome::Cancelled { attempts } => Err(RunError::Cancelled { attempts }),
        };

        teardown(session).await;
        result
    }

    async fn execute<S: BrowserSession>(&self, session: &S) -> RunSummary {
        let started_at = Utc::now();
        let stopwatch = Stopwatch::start();
        let ctx = CheckContext::new(self.base_url.clone(), self.wait_timeout);

        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let result = run_case(case, session, &ctx).await;
            info!("  {}", result);
            results.push(result);
        }

        let summary = RunSummary::new(self.base_url.as_str(), started_at, results);
        info!(
            "Suite completed in {}ms - Pass: {}/{} ({:.1}%)",
            stopwatch.elapsed_ms(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );
        summary
    }
}

/// Run one case, converting every failure mode into a result
async fn run_case<S: BrowserSession>(
    case: &TestCase,
    session: &S,
    ctx: &CheckContext,
) -> TestResult {
    info!("Running {}", case);
    let stopwatch = Stopwatch::start();

    let evaluated = AssertUnwindSafe(checks::evaluate(&case.check, session, ctx))
        .catch_unwind()
        .await;
    let duration_ms = stopwatch.elapsed_ms();
    debug!("Case {} took {}ms", case.name, duration_ms);

    match evaluated {
        Ok(Ok(CheckOutcome::Pass)) => TestResult::pass(&case.name, duration_ms),
        Ok(Ok(CheckOutcome::Fail(reason))) => TestResult::fail(&case.name, duration_ms, reason),
        Ok(Err(e)) => {
            if e.is_timeout() {
                error!("Case {} timed out: {}", case.name, e);
            } else {
                error!("Case {} errored: {}", case.name, e);
            }
            TestResult::error(&case.name, duration_ms, e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("Case {} panicked: {}", case.name, message);
            TestResult::error(&case.name, duration_ms, format!("panicked: {message}"))
        }
    }
}

async fn teardown<S: BrowserSession>(session: S) {
    if let Err(e) = session.quit().await {
        error!("Failed to close browser session: {}", e);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
