//! Output formatters for test results
//!
//! Provides JSON, Table, and summary output formats.

use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::executor::RunError;
use crate::models::{RunSummary, TestResult, TestStatus};
use crate::readiness::ReadinessOutcome;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Machine-readable record of a run that never reached its cases
#[derive(Serialize)]
struct StartupFailureJson<'a> {
    status: &'static str,
    target: &'a str,
    error: String,
    total: usize,
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                TestStatus::Pass => "\x1b[32m✓ PASS \x1b[0m",
                TestStatus::Fail => "\x1b[31m✗ FAIL \x1b[0m",
                TestStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                TestStatus::Pass => "✓ PASS ",
                TestStatus::Fail => "✗ FAIL ",
                TestStatus::Error => "! ERROR",
            }
        };

        let mut line = format!(
            "{:30} {} [{:>6}ms]",
            result.name, status_str, result.duration_ms
        );
        if let Some(message) = &result.message {
            line.push_str(&format!("\n{:30} └─ {}", "", message));
        }
        line
    }

    /// Format a run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\n══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(" Smoke run against {}\n", summary.target));
        output.push_str(&format!(
            " Started {}\n",
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str("──────────────────────────────────────────────────────────────\n");

        for result in &summary.results {
            output.push_str(&format!(" {}\n", self.format_result_table(result)));
        }

        output.push_str("──────────────────────────────────────────────────────────────\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };
        let error_str = if self.colorize && summary.errored > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.errored)
        } else {
            summary.errored.to_string()
        };

        output.push_str(&format!(
            " Total: {} | Pass: {} | Fail: {} | Error: {}\n",
            summary.total, pass_str, fail_str, error_str
        ));
        output.push_str(&format!(
            " Pass Rate: {:.1}% | Duration: {}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("══════════════════════════════════════════════════════════════\n");

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        let mut output = String::new();
        for result in &summary.results {
            output.push_str(&result.to_string());
            output.push('\n');
        }
        output.push_str(&format!("Total tests: {}\n", summary.total));
        output.push_str(&format!("Passed tests: {}\n", summary.passed));
        output.push_str(&format!("Failures: {}\n", summary.failed));
        output.push_str(&format!("Errors: {}\n", summary.errored));
        output
    }

    /// Banner for a run that stopped before executing any case
    pub fn format_startup_failure(&self, target: &str, error: &RunError) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = StartupFailureJson {
                    status: "startup_failed",
                    target,
                    error: error.to_string(),
                    total: 0,
                };
                if self.format == OutputFormat::JsonPretty {
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                } else {
                    serde_json::to_string(&json).unwrap_or_default()
                }
            }
            OutputFormat::Table | OutputFormat::Summary => {
                let title = if self.colorize {
                    "\x1b[31mSTARTUP FAILED\x1b[0m"
                } else {
                    "STARTUP FAILED"
                };
                let mut output = String::new();
                output.push_str("\n##############################################################\n");
                output.push_str(&format!(" {title}: no tests were run\n"));
                output.push_str(&format!(" Target: {target}\n"));
                output.push_str(&format!(" Reason: {error}\n"));
                output.push_str("##############################################################\n");
                output
            }
        }
    }

    /// Outcome of a readiness-only probe
    pub fn format_outcome(&self, target: &str, outcome: &ReadinessOutcome) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let value = serde_json::json!({
                    "target": target,
                    "ready": outcome.is_ready(),
                    "attempts": outcome.attempts(),
                    "outcome": outcome.to_string(),
                });
                if self.format == OutputFormat::JsonPretty {
                    serde_json::to_string_pretty(&value).unwrap_or_default()
                } else {
                    value.to_string()
                }
            }
            OutputFormat::Table | OutputFormat::Summary => {
                let mark = match (outcome.is_ready(), self.colorize) {
                    (true, true) => "\x1b[32m✓\x1b[0m",
                    (true, false) => "✓",
                    (false, true) => "\x1b[31m✗\x1b[0m",
                    (false, false) => "✗",
                };
                format!("{mark} {target}: {outcome}")
            }
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write a run summary to a file, without color
pub fn write_results_to_file(
    path: &Path,
    summary: &RunSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_summary(summary);

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
