//! Tracing subscriber setup for the replayer

use anyhow::{Context, Result};
use autoscale_core::LogConfig;
use std::fs::File;
use std::path::PathBuf;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Keeps the file writer flushing until dropped
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

impl LogGuard {
    /// File being written, if file output is on
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_path.as_ref()
    }
}

/// Level from the config unless RUST_LOG says otherwise
fn level_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy()
}

/// Open today's log file after pruning old ones
fn open_log_file(config: &LogConfig) -> Result<(NonBlocking, WorkerGuard, PathBuf)> {
    config
        .ensure_log_directory()
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;
    if let Err(e) = config.cleanup_old_logs() {
        eprintln!("Warning: could not prune old log files: {}", e);
    }

    let path = config.current_log_path();
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file: {:?}", path))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    Ok((writer, guard, path))
}

/// Install the global subscriber. Console output goes to stderr so the
/// replay summary on stdout stays clean.
pub fn init(config: &LogConfig) -> Result<LogGuard> {
    let console = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(level_filter(config))
    });

    let (file, file_guard, log_path) = if config.file_output {
        let (writer, guard, path) = open_log_file(config)?;
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(level_filter(config));
        (Some(layer), Some(guard), Some(path))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry().with(console).with(file).init();

    let guard = LogGuard {
        _file: file_guard,
        log_path,
    };
    match guard.log_path() {
        Some(path) => tracing::info!("Logging at {} to {:?}", config.level, path),
        None => tracing::info!("Logging at {}", config.level),
    }
    Ok(guard)
}
