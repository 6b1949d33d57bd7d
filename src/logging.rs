// src/logging.rs

//! Logging setup for the `ctxexec` binary using `tracing` + `tracing-subscriber`.
//!
//! Priority for choosing the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `CTXEXEC_LOG` environment variable, in `EnvFilter` syntax
//!    (e.g. "debug" or "ctxexec=debug,warn")
//! 3. default to `info`
//!
//! Logs go to STDERR so that probed output can be printed on stdout untouched.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Name of the environment variable consulted when no flag is given.
pub const LOG_ENV: &str = "CTXEXEC_LOG";

const DEFAULT_FILTER: &str = "info";

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = select_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    Ok(())
}

fn select_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(directive(lvl));
    }
    env.and_then(|spec| EnvFilter::try_new(spec.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
