//! Chromium session over the DevTools protocol
//!
//! Launches a local Chrome/Chromium through chromiumoxide and exposes a single
//! page as a [`BrowserSession`].

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserOptions, BrowserSession, SessionFactory};

/// Polling interval for element waits
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a closed browser gets to exit before it is killed
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Launches Chrome sessions from [`BrowserOptions`]
#[derive(Clone, Debug, Default)]
pub struct ChromeLauncher {
    options: BrowserOptions,
}

impl ChromeLauncher {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    fn config(&self) -> Result<BrowserConfig, BrowserError> {
        let options = &self.options;
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_width, options.window_height)
            .viewport(Viewport {
                width: options.window_width,
                height: options.window_height,
                ..Viewport::default()
            })
            .args(options.extra_args.iter().map(String::as_str));

        if !options.headless {
            builder = builder.with_head();
        }
        if options.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

impl SessionFactory for ChromeLauncher {
    type Session = ChromeSession;

    async fn create(&self) -> Result<ChromeSession, BrowserError> {
        info!(
            "Launching Chrome (headless: {}, window: {}x{})",
            self.options.headless, self.options.window_width, self.options.window_height
        );

        let config = self.config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(BrowserError::Launch(format!("failed to open page: {e}")));
            }
        };

        Ok(ChromeSession {
            browser,
            page,
            handler_task,
        })
    }
}

/// A running Chrome instance with one page
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    /// The handler loop ends once the CDP connection drops
    fn protocol_error(&self, e: impl std::fmt::Display) -> BrowserError {
        if self.handler_task.is_finished() {
            BrowserError::Closed
        } else {
            BrowserError::Protocol(e.to_string())
        }
    }

    async fn kill(&mut self) {
        if let Some(Err(e)) = self.browser.kill().await {
            warn!("Failed to kill browser process: {}", e);
        }
    }
}

impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.page.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(e) if Instant::now() < deadline => {
                    debug!("Element '{}' not present yet: {}", selector, e);
                    sleep(POLL_INTERVAL).await;
                }
                Err(_) => {
                    return Err(BrowserError::timeout(
                        format!("element '{selector}'"),
                        timeout,
                    ))
                }
            }
        }
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| self.protocol_error(e))?;
        Ok(url.unwrap_or_default())
    }

    async fn title(&self) -> Result<String, BrowserError> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| self.protocol_error(e))?;
        Ok(title.unwrap_or_default())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| self.protocol_error(e))
    }

    async fn quit(mut self) -> Result<(), BrowserError> {
        info!("Closing browser session");

        let closed = self.browser.close().await.map(|_| ());
        let closed = closed.map_err(|e| self.protocol_error(e));

        if let Err(e) = &closed {
            warn!("Close request failed ({}), killing the browser", e);
            self.kill().await;
        } else if !exited_within(self.browser.wait(), EXIT_GRACE).await {
            warn!(
                "Browser still running {}s after close, killing it",
                EXIT_GRACE.as_secs()
            );
            self.kill().await;
        }
        self.handler_task.abort();

        closed
    }
}

/// Whether a process exit future settles within `limit`
async fn exited_within<T, E: Display>(
    exit: impl Future<Output = Result<T, E>>,
    limit: Duration,
) -> bool {
    match tokio::time::timeout(limit, exit).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            warn!("Browser process did not exit cleanly: {}", e);
            true
        }
        Err(_) => false,
    }
}
