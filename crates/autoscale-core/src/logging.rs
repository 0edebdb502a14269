//! Logging Configuration
//!
//! Settings for the tracing setup done by the application crate: level,
//! console/file switches, log directory and how many old files to keep.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level name (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a file in `log_dir`
    pub file_output: bool,
    /// Number of log files to keep, newest first
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: Self::default_log_dir(),
            console_output: true,
            file_output: false,
            max_files: 10,
        }
    }
}

impl LogConfig {
    /// Log directory in the user data directory, or `./logs`
    pub fn default_log_dir() -> PathBuf {
        dirs::data_dir()
            .map(|p| p.join("AutoScale").join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Parse the level name, defaulting to INFO
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory if needed
    pub fn ensure_log_directory(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.log_dir)
    }

    /// Path of today's log file
    pub fn current_log_path(&self) -> PathBuf {
        let date = chrono::Local::now().format("%Y-%m-%d");
        self.log_dir.join(format!("autoscale_{}.log", date))
    }

    /// Delete the oldest `autoscale_*.log` files beyond `max_files`
    pub fn cleanup_old_logs(&self) -> std::io::Result<()> {
        let mut logs: Vec<PathBuf> = std::fs::read_dir(&self.log_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("autoscale_") && n.ends_with(".log"))
            })
            .collect();

        if logs.len() <= self.max_files {
            return Ok(());
        }

        // Date-stamped names sort chronologically
        logs.sort();
        let excess = logs.len() - self.max_files;
        for path in logs.into_iter().take(excess) {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}
