//! Browser automation capability
//!
//! The harness drives a single browser session through the
//! [`BrowserSession`] trait. [`ChromeLauncher`] provides the real
//! implementation on top of chromiumoxide.

mod chrome;
mod wait;

pub use chrome::ChromeLauncher;
pub use wait::wait_for_url_contains;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// DOM marker used to decide that a document has loaded
pub const BODY_SELECTOR: &str = "body";

/// Browser errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {}ms waiting for {condition}", .timeout.as_millis())]
    Timeout {
        condition: String,
        timeout: Duration,
    },

    #[error("Browser protocol error: {0}")]
    Protocol(String),

    #[error("Browser session closed")]
    Closed,
}

impl BrowserError {
    pub fn timeout(condition: impl Into<String>, timeout: Duration) -> Self {
        BrowserError::Timeout {
            condition: condition.into(),
            timeout,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }
}

/// One browser session shared by the whole suite
pub trait BrowserSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Wait until `selector` matches an element, bounded by `timeout`
    async fn wait_for_element(&self, selector: &str, timeout: Duration)
        -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Document title; empty when the page has none
    async fn title(&self) -> Result<String, BrowserError>;

    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Dispose of the session and the browser process behind it
    async fn quit(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}

/// Creates the suite's browser session
pub trait SessionFactory {
    type Session: BrowserSession;

    async fn create(&self) -> Result<Self::Session, BrowserError>;
}

/// Launch options passed through to the browser
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Run without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Disable the Chrome sandbox (needed in most containers)
    #[serde(default = "default_true")]
    pub no_sandbox: bool,

    /// Window width in pixels
    #[serde(default = "default_width")]
    pub window_width: u32,

    /// Window height in pixels
    #[serde(default = "default_height")]
    pub window_height: u32,

    /// Path to a Chrome/Chromium executable; autodetected when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Extra command-line switches
    #[serde(default = "default_args")]
    pub extra_args: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_args() -> Vec<String> {
    vec![
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
    ]
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: true,
            window_width: default_width(),
            window_height: default_height(),
            chrome_executable: None,
            extra_args: default_args(),
        }
    }
}

impl BrowserOptions {
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BrowserOptions::default();
        assert!(options.headless);
        assert!(options.no_sandbox);
        assert_eq!((options.window_width, options.window_height), (1920, 1080));
        assert!(options.extra_args.contains(&"--disable-gpu".to_string()));
    }

    #[test]
    fn test_options_builder() {
        let options = BrowserOptions::default()
            .headed()
            .chrome_executable("/opt/chrome/chrome");

        assert!(!options.headless);
        assert!(options.no_sandbox);
        assert_eq!(
            options.chrome_executable,
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn test_options_yaml_defaults() {
        let options: BrowserOptions = serde_yaml::from_str("window_width: 1024").unwrap();
        assert!(options.headless);
        assert_eq!(options.window_width, 1024);
        assert_eq!(options.window_height, 1080);
        assert_eq!(options.extra_args, default_args());
    }

    #[test]
    fn test_timeout_error_message() {
        let err = BrowserError::timeout("element 'body'", Duration::from_secs(10));
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Timed out after 10000ms waiting for element 'body'"
        );
    }
}
