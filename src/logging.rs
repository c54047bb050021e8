use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable that overrides the log filter (e.g. "gh_menu=trace")
pub const LOG_ENV_VAR: &str = "GH_MENU_LOG";
pub const LOG_FILE_NAME: &str = "gh-menu.log";

/// Where logs and the PID file live.
///
/// ~/Library/Logs/gh-menu on macOS, the local data dir elsewhere.
pub fn get_log_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library").join("Logs").join("gh-menu");
        }
    }
    dirs::data_local_dir()
        .map(|p| p.join("gh-menu").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("gh-menu"))
}

/// File the daily appender writes to on `today` (UTC): `gh-menu.log.YYYY-MM-DD`.
pub fn log_file_path(log_dir: &Path, today: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}.{}", LOG_FILE_NAME, today.format("%Y-%m-%d")))
}

/// Keeps the background log writer alive; pending lines are flushed on drop.
pub struct Guard(#[allow(dead_code)] WorkerGuard);

/// Install the global subscriber.
///
/// Every event goes to a daily-rolled file in `log_dir`. `to_stderr` also
/// mirrors events to stderr; leave it off while the terminal menu owns the
/// screen.
pub fn init_logging(log_dir: &Path, verbose: bool, to_stderr: bool) -> Result<Guard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let default_filter = if verbose { "gh_menu=debug" } else { "gh_menu=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(file_writer);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(Guard(guard))
}
