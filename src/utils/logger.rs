//! Logging setup
//!
//! Diagnostics go to stderr so that stdout carries only the report, which
//! keeps `--format json` output pipeable.

use anyhow::anyhow;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Dependencies that are capped at warn unless the harness itself is quieter
const CHATTY_TARGETS: &[&str] = &["chromiumoxide", "tungstenite", "hyper", "reqwest"];

/// Pick the harness log level: `--log-level` wins over `--verbose`
pub fn resolve_level(explicit: Option<&str>, verbose: bool) -> anyhow::Result<Level> {
    match explicit {
        Some(name) => name
            .parse::<Level>()
            .map_err(|_| anyhow!("Unknown log level: {name}")),
        None if verbose => Ok(Level::DEBUG),
        None => Ok(Level::INFO),
    }
}

/// Filter directives for `level`
fn directives(level: Level) -> String {
    // tracing orders levels by verbosity, so min() picks the quieter one
    let cap = level.min(Level::WARN);
    let mut directives = format!("webapp_smoke={}", level.as_str().to_lowercase());
    for target in CHATTY_TARGETS {
        directives.push_str(&format!(",{}={}", target, cap.as_str().to_lowercase()));
    }
    directives
}

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// computed directives.
pub fn init_logger(level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
