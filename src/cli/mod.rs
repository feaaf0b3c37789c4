//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Browser smoke tests for a deployed storefront
#[derive(Parser, Debug)]
#[command(name = "webapp-smoke")]
#[command(version)]
#[command(about = "Wait for a web application to come up, then smoke test it in Chrome")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error); overrides --verbose
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wait for the application, then run the suite
    Run(RunArgs),

    /// Only wait for the application to become ready
    Probe(TargetArgs),

    /// List the cases that would run
    List(ListArgs),

    /// Inspect or create configuration
    Config(ConfigArgs),
}

/// Target selection and readiness overrides shared by `run` and `probe`
#[derive(ClapArgs, Debug, Default)]
pub struct TargetArgs {
    /// Base URL of the application under test
    #[arg(short, long)]
    pub url: Option<String>,

    /// Target profile from the config file
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Readiness attempts before giving up
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Seconds between readiness attempts
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Seconds to wait for each page condition
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Path to the Chrome/Chromium executable
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// Accept invalid TLS certificates (self-signed staging targets)
    #[arg(long)]
    pub insecure: bool,
}

/// Arguments for run command
#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run only the named cases (repeatable)
    #[arg(long = "case", value_name = "NAME")]
    pub cases: Vec<String>,

    /// Skip the named cases (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub skip: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for list command
#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Show each case's check
    #[arg(short, long)]
    pub detailed: bool,

    /// List the cases of this profile instead of the built-in suite
    #[arg(short, long)]
    pub profile: Option<String>,
}

/// Arguments for config command
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Destination path
        #[arg(default_value = "webapp-smoke.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Describe the supported environment variables
    Env,
}
