use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::model::config::LogConfig;

/// Default log file for the TUI
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("tack.log")
}

/// `RUST_LOG` if it holds a usable filter, otherwise `fallback`
fn filter_or(fallback: &str) -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// File logging for the TUI. The terminal belongs to ratatui, so nothing is
/// written to stdout or stderr. Hold the returned guard until shutdown so
/// buffered lines get flushed.
pub fn init_file_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let log_path = config
        .file
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_log_path);

    let log_dir = log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let installed = tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter_or(&config.level))
        .with_ansi(false)
        .try_init()
        .is_ok();

    installed.then_some(guard)
}

/// Stderr logging for CLI commands. Off unless `RUST_LOG` is set or
/// `verbose` asks for it.
pub fn init_cli_logging(verbose: bool) {
    let fallback = if verbose { "tack=debug" } else { "off" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter_or(fallback))
        .try_init();
}
