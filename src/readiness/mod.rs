//! Readiness gating
//!
//! Decides, within a bounded number of attempts, whether the target is
//! reachable and renders before any test case runs.

mod gate;
mod policy;

pub use gate::{ReadinessGate, ReadinessOutcome};
pub use policy::RetryPolicy;
