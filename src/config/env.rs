//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "WEBAPP_SMOKE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from WEBAPP_SMOKE_URL
    pub base_url: Option<String>,
    /// Retry count from WEBAPP_SMOKE_RETRIES
    pub retries: Option<u32>,
    /// Retry delay in seconds from WEBAPP_SMOKE_RETRY_DELAY
    pub retry_delay: Option<u64>,
    /// Wait timeout in seconds from WEBAPP_SMOKE_TIMEOUT
    pub timeout: Option<u64>,
    /// Probe timeout in seconds from WEBAPP_SMOKE_PROBE_TIMEOUT
    pub probe_timeout: Option<u64>,
    /// Headless mode from WEBAPP_SMOKE_HEADLESS
    pub headless: Option<bool>,
    /// Sandbox disabling from WEBAPP_SMOKE_NO_SANDBOX
    pub no_sandbox: Option<bool>,
    /// Invalid certificate acceptance from WEBAPP_SMOKE_INSECURE
    pub insecure: Option<bool>,
    /// Chrome executable from WEBAPP_SMOKE_CHROME
    pub chrome: Option<String>,
    /// Config file from WEBAPP_SMOKE_CONFIG
    pub config_file: Option<String>,
    /// Target profile from WEBAPP_SMOKE_PROFILE
    pub profile: Option<String>,
    /// Output format from WEBAPP_SMOKE_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("URL"),
            retries: get_env_parse("RETRIES"),
            retry_delay: get_env_parse("RETRY_DELAY"),
            timeout: get_env_parse("TIMEOUT"),
            probe_timeout: get_env_parse("PROBE_TIMEOUT"),
            headless: get_env_bool("HEADLESS"),
            no_sandbox: get_env_bool("NO_SANDBOX"),
            insecure: get_env_bool("INSECURE"),
            chrome: get_env("CHROME"),
            config_file: get_env("CONFIG"),
            profile: get_env("PROFILE"),
            format: get_env("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.retries.is_some()
            || self.retry_delay.is_some()
            || self.timeout.is_some()
            || self.probe_timeout.is_some()
            || self.headless.is_some()
            || self.no_sandbox.is_some()
            || self.insecure.is_some()
            || self.chrome.is_some()
            || self.config_file.is_some()
            || self.profile.is_some()
            || self.format.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_URL:           {:?}", ENV_PREFIX, self.base_url);
        println!("  {}_RETRIES:       {:?}", ENV_PREFIX, self.retries);
        println!("  {}_RETRY_DELAY:   {:?}", ENV_PREFIX, self.retry_delay);
        println!("  {}_TIMEOUT:       {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_PROBE_TIMEOUT: {:?}", ENV_PREFIX, self.probe_timeout);
        println!("  {}_HEADLESS:      {:?}", ENV_PREFIX, self.headless);
        println!("  {}_NO_SANDBOX:    {:?}", ENV_PREFIX, self.no_sandbox);
        println!("  {}_INSECURE:      {:?}", ENV_PREFIX, self.insecure);
        println!("  {}_CHROME:        {:?}", ENV_PREFIX, self.chrome);
        println!("  {}_CONFIG:        {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_PROFILE:       {:?}", ENV_PREFIX, self.profile);
        println!("  {}_FORMAT:        {:?}", ENV_PREFIX, self.format);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all WEBAPP_SMOKE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_URL            Base URL of the application under test");
    println!("  {ENV_PREFIX}_RETRIES        Readiness attempts before giving up");
    println!("  {ENV_PREFIX}_RETRY_DELAY    Seconds between readiness attempts");
    println!("  {ENV_PREFIX}_TIMEOUT        Seconds to wait for a page condition");
    println!("  {ENV_PREFIX}_PROBE_TIMEOUT  Seconds for the HTTP liveness probe");
    println!("  {ENV_PREFIX}_HEADLESS       Run the browser headless (true/false)");
    println!("  {ENV_PREFIX}_NO_SANDBOX     Disable the Chrome sandbox (true/false)");
    println!("  {ENV_PREFIX}_INSECURE       Accept invalid TLS certificates (true/false)");
    println!("  {ENV_PREFIX}_CHROME         Path to the Chrome/Chromium executable");
    println!("  {ENV_PREFIX}_CONFIG         Path to configuration file");
    println!("  {ENV_PREFIX}_PROFILE        Target profile name from the config file");
    println!("  {ENV_PREFIX}_FORMAT         Output format (table, json, summary)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_URL=http://localhost:3000/");
    println!("  export {ENV_PREFIX}_RETRIES=20");
    println!("  webapp-smoke run");
}
