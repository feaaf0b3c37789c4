//! Bounded wait conditions built on the session capability

use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::{BrowserError, BrowserSession};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll the current URL until it contains `needle` or `timeout` elapses.
///
/// Returns the matching URL.
pub async fn wait_for_url_contains<S: BrowserSession>(
    session: &S,
    needle: &str,
    timeout: Duration,
) -> Result<String, BrowserError> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = session.current_url().await?;
        if url.contains(needle) {
            return Ok(url);
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::timeout(
                format!("URL containing '{needle}' (last: {url})"),
                timeout,
            ));
        }
        sleep(POLL_INTERVAL).await;
    }
}
