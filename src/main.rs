//! webapp-smoke - Browser smoke tests for a deployed web application
//!
//! Waits until the application under test answers over HTTP and renders in
//! Chrome, then runs an ordered suite of page checks against one shared
//! browser session and reports a pass/fail summary suitable for CI gating.
//!
//! ## Features
//!
//! - Readiness gate combining an HTTP liveness probe with a browser render probe
//! - Built-in storefront suite (home, products, login, register, cart redirect)
//! - Target profiles with per-profile case selection
//! - Multiple output formats (Table, JSON, Summary)
//! - Exit codes: 0 all passed, 1 failures, 2 the application never came up
//!
//! ## Usage
//!
//! ```bash
//! # Run the suite against a local dev server
//! webapp-smoke run --url http://localhost:3000/
//!
//! # Give a container more time to boot
//! webapp-smoke run --profile container --retries 30
//!
//! # Only wait for readiness
//! webapp-smoke probe --url http://frontend:3000/
//!
//! # List cases
//! webapp-smoke list --detailed
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

mod browser;
mod checks;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod readiness;
mod utils;

#[cfg(test)]
mod testing;

use browser::{BrowserSession, ChromeLauncher, SessionFactory};
use cli::{Args, TargetArgs};
use config::{ConfigFile, EnvConfig, HarnessConfig, TargetProfile};
use executor::SuiteRunner;
use http::HttpProbe;
use models::TestCase;
use output::{OutputFormat, ResultFormatter};
use readiness::ReadinessGate;
use utils::{init_logger, resolve_level};

/// One or more cases failed or errored
const EXIT_FAILURES: u8 = 1;
/// The suite never started
const EXIT_STARTUP: u8 = 2;

/// Fully layered settings for one invocation
struct Settings {
    config: HarnessConfig,
    cases: Vec<TestCase>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logger(resolve_level(args.log_level.as_deref(), args.verbose)?);

    let env = EnvConfig::load();
    let config_path = args.config.clone();

    match args.command {
        cli::Command::Run(run_args) => {
            run_suite(run_args, config_path.as_deref(), &env).await
        }
        cli::Command::Probe(target) => {
            probe_target(target, config_path.as_deref(), &env).await
        }
        cli::Command::List(list_args) => {
            list_cases(list_args, config_path.as_deref(), &env)?;
            Ok(ExitCode::SUCCESS)
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, config_path.as_deref(), &env)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_suite(
    args: cli::RunArgs,
    config_path: Option<&Path>,
    env: &EnvConfig,
) -> Result<ExitCode> {
    let settings = load_settings(config_path, env, &args.target)?;
    let config = settings.config;
    let cases = filter_cases(settings.cases, &args.cases, &args.skip)?;

    let format_name = args.format.as_deref().unwrap_or(&config.format);
    let format = OutputFormat::from_str(format_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format_name}"))?;
    let mut formatter = ResultFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }

    let base_url = config.base_url()?;
    let gate = ReadinessGate::new(
        HttpProbe::new().accept_invalid_certs(config.accept_invalid_certs),
        config.retry_policy(),
    )
    .with_cancel_check(cancel_on_ctrl_c());
    let launcher = ChromeLauncher::new(config.browser_options());
    let runner = SuiteRunner::new(base_url.clone(), cases).wait_timeout(config.wait_timeout());
    info!("Testing {} ({} case(s))", base_url, runner.cases().len());

    match runner.run(&gate, &launcher).await {
        Ok(summary) => {
            println!("{}", formatter.format_summary(&summary));

            if let Some(path) = &args.output {
                output::write_results_to_file(path, &summary, format)?;
                info!("Results saved to {}", path.display());
            }

            if summary.has_failures() {
                Ok(ExitCode::from(EXIT_FAILURES))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(e) => {
            eprintln!("{}", formatter.format_startup_failure(base_url.as_str(), &e));
            Ok(ExitCode::from(EXIT_STARTUP))
        }
    }
}

async fn probe_target(
    target: TargetArgs,
    config_path: Option<&Path>,
    env: &EnvConfig,
) -> Result<ExitCode> {
    let config = load_settings(config_path, env, &target)?.config;
    let format = OutputFormat::from_str(&config.format).unwrap_or(OutputFormat::Table);
    let formatter = ResultFormatter::new(format);
    let base_url = config.base_url()?;

    let gate = ReadinessGate::new(
        HttpProbe::new().accept_invalid_certs(config.accept_invalid_certs),
        config.retry_policy(),
    )
    .with_cancel_check(cancel_on_ctrl_c());
    let launcher = ChromeLauncher::new(config.browser_options());

    let session = match launcher.create().await {
        Ok(session) => session,
        Err(e) => {
            let error = executor::RunError::SessionStart(e);
            eprintln!("{}", formatter.format_startup_failure(base_url.as_str(), &error));
            return Ok(ExitCode::from(EXIT_STARTUP));
        }
    };

    let outcome = gate.wait_until_ready(&session, &base_url).await;
    if let Err(e) = session.quit().await {
        warn!("Failed to close browser session: {}", e);
    }

    println!("{}", formatter.format_outcome(base_url.as_str(), &outcome));
    if outcome.is_ready() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_STARTUP))
    }
}

fn list_cases(args: cli::ListArgs, config_path: Option<&Path>, env: &EnvConfig) -> Result<()> {
    let target = TargetArgs {
        profile: args.profile,
        ..Default::default()
    };
    let settings = load_settings(config_path, env, &target)?;

    println!(
        "\nSmoke cases for {} ({} total)\n",
        settings.config.base_url,
        settings.cases.len()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (index, case) in settings.cases.iter().enumerate() {
        println!("  {:2}. {:30} [{}]", index + 1, case.name, case.check.kind());
        if args.detailed {
            if !case.description.is_empty() {
                println!("      {}", case.description);
            }
            println!("      check: {}", case.check);
        }
    }

    println!();
    Ok(())
}

fn manage_config(
    args: cli::ConfigArgs,
    config_path: Option<&Path>,
    env: &EnvConfig,
) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            ConfigFile::example().save(&path)?;
            println!("✓ Configuration file created: {}", path.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show => {
            let settings = load_settings(config_path, env, &TargetArgs::default())?;
            println!("{}", serde_yaml::to_string(&settings.config)?);
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
            println!();
            if env.has_any() {
                env.print_summary();
            } else {
                println!("No WEBAPP_SMOKE_* variables are set.");
            }
        }
    }

    Ok(())
}

/// Layer defaults, config file, profile, environment and CLI flags
fn load_settings(
    config_path: Option<&Path>,
    env: &EnvConfig,
    target: &TargetArgs,
) -> Result<Settings> {
    let file = match config_path
        .map(Path::to_path_buf)
        .or_else(|| env.config_file.as_ref().map(Into::into))
    {
        Some(path) => ConfigFile::load(&path)?,
        None => ConfigFile::load_default()?,
    };

    let mut config = file.harness.clone();

    let profile_name = target.profile.as_deref().or(env.profile.as_deref());
    let cases = match profile_name {
        Some(name) => {
            let profile = find_profile(&file, name)?;
            profile.apply(&mut config);
            profile.select_cases()?
        }
        None => checks::builtin_suite(),
    };

    config.apply_env(env);

    if let Some(url) = &target.url {
        config.base_url = url.clone();
    }
    if let Some(retries) = target.retries {
        config.retries = retries;
    }
    if let Some(delay) = target.retry_delay {
        config.retry_delay_secs = delay;
    }
    if let Some(timeout) = target.timeout {
        config.wait_timeout_secs = timeout;
    }
    if target.headed {
        config.browser = config.browser.headed();
    }
    if let Some(chrome) = &target.chrome {
        config.browser = config.browser.chrome_executable(chrome);
    }
    if target.insecure {
        config.accept_invalid_certs = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(Settings { config, cases })
}

/// Profiles from the config file shadow the built-in presets
fn find_profile(file: &ConfigFile, name: &str) -> Result<TargetProfile> {
    if let Some(profile) = file.profile(name) {
        return Ok(profile.clone());
    }
    [TargetProfile::local(), TargetProfile::container()]
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| anyhow::anyhow!("Unknown target profile: {name}"))
}

/// Apply `--case` selection and `--skip` exclusion, preserving order
fn filter_cases(
    cases: Vec<TestCase>,
    only: &[String],
    skip: &[String],
) -> Result<Vec<TestCase>> {
    for name in only.iter().chain(skip) {
        if !cases.iter().any(|c| &c.name == name) {
            anyhow::bail!("Unknown case: {name}");
        }
    }
    for (index, name) in only.iter().enumerate() {
        if only[..index].contains(name) {
            anyhow::bail!("Case {name} selected more than once");
        }
    }

    let selected: Vec<TestCase> = if only.is_empty() {
        cases
    } else {
        only.iter()
            .filter_map(|name| cases.iter().find(|c| &c.name == name).cloned())
            .collect()
    };

    let selected: Vec<TestCase> = selected
        .into_iter()
        .filter(|c| !skip.contains(&c.name))
        .collect();

    if selected.is_empty() {
        anyhow::bail!("No cases selected");
    }
    Ok(selected)
}

/// First Ctrl-C cancels the readiness wait, a second one exits
fn cancel_on_ctrl_c() -> impl Fn() -> bool + Send + Sync + 'static {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling readiness wait (press Ctrl-C again to abort)");
            flag.store(true, Ordering::SeqCst);
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    move || cancelled.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Check;

    fn names(cases: &[TestCase]) -> Vec<&str> {
        cases.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_filter_cases_only_keeps_requested_order() {
        let only = vec!["home_page_title".to_string(), "load_home_page".to_string()];
        let cases = filter_cases(checks::builtin_suite(), &only, &[]).unwrap();
        assert_eq!(names(&cases), vec!["home_page_title", "load_home_page"]);
    }

    #[test]
    fn test_filter_cases_skip() {
        let skip = vec!["basic_routes_no_errors".to_string()];
        let cases = filter_cases(checks::builtin_suite(), &[], &skip).unwrap();
        assert_eq!(cases.len(), checks::builtin_suite().len() - 1);
        assert!(!names(&cases).contains(&"basic_routes_no_errors"));
    }

    #[test]
    fn test_filter_cases_rejects_unknown_and_empty() {
        let unknown = vec!["checkout".to_string()];
        assert!(filter_cases(checks::builtin_suite(), &unknown, &[]).is_err());

        let cases = vec![TestCase::new("only", Check::title_present("/"))];
        let skip = vec!["only".to_string()];
        assert!(filter_cases(cases, &[], &skip).is_err());
    }

    #[test]
    fn test_filter_cases_rejects_repeated_selection() {
        let only = vec![
            "load_home_page".to_string(),
            "home_page_title".to_string(),
            "load_home_page".to_string(),
        ];
        let err = filter_cases(checks::builtin_suite(), &only, &[]).unwrap_err();
        assert!(err.to_string().contains("load_home_page"));
    }

    #[test]
    fn test_load_settings_layers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webapp-smoke.yaml");
        let mut file = ConfigFile::example();
        file.harness.retries = 4;
        file.save(&path).unwrap();

        let env = EnvConfig {
            retry_delay: Some(1),
            ..Default::default()
        };
        let target = TargetArgs {
            profile: Some("container".to_string()),
            timeout: Some(30),
            ..Default::default()
        };

        let settings = load_settings(Some(&path), &env, &target).unwrap();
        assert_eq!(settings.config.base_url, "http://frontend:3000/");
        // profile beats file, env beats profile, CLI beats both
        assert_eq!(settings.config.retries, 20);
        assert_eq!(settings.config.retry_delay_secs, 1);
        assert_eq!(settings.config.wait_timeout_secs, 30);
        assert!(!settings.config.accept_invalid_certs);
        assert_eq!(settings.cases, checks::builtin_suite());

        let insecure = TargetArgs {
            insecure: true,
            ..Default::default()
        };
        let settings = load_settings(Some(&path), &EnvConfig::default(), &insecure).unwrap();
        assert!(settings.config.accept_invalid_certs);
    }

    #[test]
    fn test_unknown_profile() {
        let file = ConfigFile::default();
        assert!(find_profile(&file, "local").is_ok());
        assert!(find_profile(&file, "production").is_err());
    }
}
