//! Configuration module
//!
//! Handles loading and layering configuration: defaults, then the config
//! file, then `WEBAPP_SMOKE_*` environment variables, then CLI flags.

mod env;
mod file;
mod profile;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;
pub use profile::TargetProfile;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::browser::BrowserOptions;
use crate::models::BaseUrl;
use crate::readiness::RetryPolicy;

const IGNORE_CERT_ERRORS: &str = "--ignore-certificate-errors";

/// Harness configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Absolute URL of the application under test
    pub base_url: String,

    /// Readiness attempts before giving up
    pub retries: u32,

    /// Seconds between readiness attempts
    pub retry_delay_secs: u64,

    /// Upper bound in seconds for each browser wait
    pub wait_timeout_secs: u64,

    /// Timeout in seconds of the HTTP liveness probe
    pub probe_timeout_secs: u64,

    /// Default output format
    pub format: String,

    /// Accept invalid TLS certificates in the liveness probe and the browser
    pub accept_invalid_certs: bool,

    /// Browser launch options
    pub browser: BrowserOptions,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/".to_string(),
            retries: 10,
            retry_delay_secs: 5,
            wait_timeout_secs: 10,
            probe_timeout_secs: 1,
            format: "table".to_string(),
            accept_invalid_certs: false,
            browser: BrowserOptions::default(),
        }
    }
}

impl HarnessConfig {
    /// Parsed and validated base URL
    pub fn base_url(&self) -> Result<BaseUrl> {
        BaseUrl::parse(&self.base_url).context("Invalid base_url in configuration")
    }

    /// Retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .max_retries(self.retries)
            .retry_delay(Duration::from_secs(self.retry_delay_secs))
            .navigation_timeout(self.wait_timeout())
            .probe_timeout(Duration::from_secs(self.probe_timeout_secs))
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Browser launch options, with certificate errors ignored when opted in
    pub fn browser_options(&self) -> BrowserOptions {
        let mut options = self.browser.clone();
        let present = options.extra_args.iter().any(|a| a == IGNORE_CERT_ERRORS);
        if self.accept_invalid_certs && !present {
            options.extra_args.push(IGNORE_CERT_ERRORS.to_string());
        }
        options
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        self.retry_policy()
            .validate()
            .context("Invalid retry settings")?;
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            anyhow::bail!(
                "Invalid viewport {}x{}",
                self.browser.window_width,
                self.browser.window_height
            );
        }
        Ok(())
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.base_url {
            self.base_url = url.clone();
        }
        if let Some(retries) = env.retries {
            self.retries = retries;
        }
        if let Some(delay) = env.retry_delay {
            self.retry_delay_secs = delay;
        }
        if let Some(timeout) = env.timeout {
            self.wait_timeout_secs = timeout;
        }
        if let Some(timeout) = env.probe_timeout {
            self.probe_timeout_secs = timeout;
        }
        if let Some(headless) = env.headless {
            self.browser.headless = headless;
        }
        if let Some(no_sandbox) = env.no_sandbox {
            self.browser.no_sandbox = no_sandbox;
        }
        if let Some(chrome) = &env.chrome {
            self.browser.chrome_executable = Some(chrome.into());
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(insecure) = env.insecure {
            self.accept_invalid_certs = insecure;
        }
    }
}
