//! HTTP liveness probing
//!
//! Provides the reqwest client and the liveness probe built on it.

mod client;
mod probe;

pub use probe::{HttpProbe, LivenessProbe, ProbeResult};
