//! Shared utilities

mod logger;
mod stopwatch;

pub use logger::{init_logger, resolve_level};
pub use stopwatch::Stopwatch;
