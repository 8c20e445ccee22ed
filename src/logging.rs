use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CHRONOTRACK_LOG";
const DEBUG_ENV: &str = "CHRONOTRACK_DEBUG_LOG";

/// Route tracing output to a daily log file under `log_dir`.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// Returns the writer guard, which must live until exit for the last lines to
/// be flushed. Failing to set up logging is not fatal.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let log_dir = log_dir?;
    if std::fs::create_dir_all(log_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, "chronotrack.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

fn env_filter() -> EnvFilter {
    let debug_enabled = env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
