//! Log setup.
//!
//! Logs go to a daily-rotated file so they never land in the middle of the
//! game screen. `RUST_LOG` overrides the default filter.

use anyhow::Result;
use spotai_infrastructure::SpotaiPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "spotai.log";

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init(verbose: bool) -> Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,spotai={0},spotai_core={0},spotai_application={0},spotai_infrastructure={0}",
            default_level
        ))
    });

    let logs_dir = match SpotaiPaths::logs_dir() {
        Ok(dir) => dir,
        Err(_) => {
            // No home directory: only warnings, on stderr.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("warn"))
                .with_writer(std::io::stderr)
                .init();
            return Ok(None);
        }
    };
    std::fs::create_dir_all(&logs_dir)?;

    let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::debug!("[Logging] Writing logs to {}", logs_dir.display());
    Ok(Some(guard))
}
