//! Durations recorded in results
//!
//! Measured on tokio's clock, so under a paused runtime a case's duration is
//! exactly the virtual time its waits consumed.

use tokio::time::Instant;

/// Millisecond stopwatch for cases and whole runs
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Whole milliseconds since `start`
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_follows_tokio_clock() {
        let stopwatch = Stopwatch::start();
        assert_eq!(stopwatch.elapsed_ms(), 0);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(stopwatch.elapsed_ms(), 1500);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(stopwatch.elapsed_ms(), 31_500);
    }
}
