//! Tracing subscriber setup.
//!
//! The filter comes from `LAZYTREE_LOG`, then the config's `log_filter`, then
//! a per-target default (`info` for the log file, `warn` on stderr). The
//! terminal view owns the screen, so it logs to a file under
//! [`paths::logs_dir`]; line-oriented commands log to stderr.
//!
//! [`paths::logs_dir`]: crate::config::paths::logs_dir

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "LAZYTREE_LOG";
pub const LOG_FILE_NAME: &str = "lazytree.log";
const FILE_DEFAULT: &str = "info";
const STDERR_DEFAULT: &str = "warn";

/// Builds the filter from the environment, then `fallback`, then `default`.
pub fn env_filter(fallback: Option<&str>, default: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    fallback
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Installs a subscriber writing to `<dir>/lazytree.log`.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes buffered lines.
pub fn init_file(dir: &Path, fallback: Option<&str>) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(fallback, FILE_DEFAULT))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Installs a subscriber writing to stderr.
pub fn init_stderr(fallback: Option<&str>) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(fallback, STDERR_DEFAULT))
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
