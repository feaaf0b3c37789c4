//! Test result models
//!
//! Defines per-case results and the run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail(name: impl Into<String>, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Fail,
            duration_ms,
            message: Some(message.into()),
        }
    }

    pub fn error(name: impl Into<String>, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Error,
            duration_ms,
            message: Some(error.into()),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.name,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Aggregate of one suite run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn new(
        target: impl Into<String>,
        started_at: DateTime<Utc>,
        results: Vec<TestResult>,
    ) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            target: target.into(),
            started_at,
            total: results.len(),
            passed: count(TestStatus::Pass),
            failed: count(TestStatus::Fail),
            errored: count(TestStatus::Error),
            total_duration_ms: results.iter().map(|r| r.duration_ms).sum(),
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// True when any case failed or errored
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.status.is_success())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run against {}", self.target)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {}",
            self.total, self.passed, self.failed, self.errored
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass("load_home_page", 100);
        assert!(result.status.is_success());
        assert_eq!(result.duration_ms, 100);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_run_summary_counts() {
        let results = vec![
            TestResult::pass("load_home_page", 100),
            TestResult::fail("load_products_page", 50, "URL did not contain /products"),
            TestResult::error("navigate_to_login_page", 10, "Timed out"),
            TestResult::pass("home_page_title", 40),
        ];

        let summary = RunSummary::new("http://localhost:3000/", Utc::now(), results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total_duration_ms, 200);
        assert_eq!(summary.pass_rate(), 50.0);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::new("http://localhost:3000/", Utc::now(), Vec::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate(), 0.0);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_result_display() {
        let result = TestResult::fail("redirect_to_login_from_cart", 12, "ended on /cart");
        assert_eq!(
            result.to_string(),
            "✗ redirect_to_login_from_cart [12ms] - ended on /cart"
        );
    }
}
