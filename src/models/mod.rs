//! Data models for the smoke harness
//!
//! This module contains the data structures shared across the harness.

mod case;
mod target;
mod test_result;

pub use case::{Check, CheckOutcome, TestCase};
pub use target::BaseUrl;
pub use test_result::{RunSummary, TestResult, TestStatus};
