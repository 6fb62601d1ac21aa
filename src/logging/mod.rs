//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FORMAT: "compact" (default), "pretty" or "full"
//! - LOG_FILE_PATH: when using file mode, the path of the log file
//!   (default "./logs/galactic-horizon.log"), rolled daily by name
//!
//! The library itself only emits `tracing` events; binaries call
//! [`setup_logging`] once at startup.

use chrono::{NaiveDate, Utc};
use std::{
    env,
    fs::{create_dir_all, OpenOptions},
    path::Path,
    sync::Mutex,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::{
    DEFAULT_LOG_DIR, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, DEFAULT_LOG_MODE, LOG_FILE_NAME,
};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unable to open log file {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Appends the date to the log file name: `logs/app.log` becomes
/// `logs/app-2024-01-31.log`.
pub fn rolled_log_file_path(base_file_path: &str, date: NaiveDate) -> String {
    let date_str = date.format("%Y-%m-%d");
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{}-{}.log", trimmed, date_str),
        None => format!("{}-{}.log", base_file_path, date_str),
    }
}

fn level_filter(log_level: &str) -> EnvFilter {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => DEFAULT_LOG_LEVEL,
    };
    EnvFilter::new(level)
}

pub fn setup_logging() -> Result<(), LoggingError> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| DEFAULT_LOG_MODE.to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| DEFAULT_LOG_FORMAT.to_string());

    let builder = fmt().with_env_filter(level_filter(&log_level)).with_target(true);

    let result = if log_mode.eq_ignore_ascii_case("file") {
        let base_file_path = env::var("LOG_FILE_PATH")
            .unwrap_or_else(|_| format!("{}/{}", DEFAULT_LOG_DIR, LOG_FILE_NAME));
        let rolled_file_path = rolled_log_file_path(&base_file_path, Utc::now().date_naive());

        if let Some(parent) = Path::new(&rolled_file_path).parent() {
            create_dir_all(parent).map_err(|source| LoggingError::File {
                path: rolled_file_path.clone(),
                source,
            })?;
        }
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&rolled_file_path)
            .map_err(|source| LoggingError::File {
                path: rolled_file_path.clone(),
                source,
            })?;

        let builder = builder.with_ansi(false).with_writer(Mutex::new(log_file));
        match log_format.as_str() {
            "pretty" => builder.pretty().try_init(),
            "full" => builder.try_init(),
            _ => builder.compact().try_init(),
        }
    } else {
        match log_format.as_str() {
            "pretty" => builder.pretty().try_init(),
            "full" => builder.try_init(),
            _ => builder.compact().try_init(),
        }
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    info!(mode = %log_mode, level = %log_level, "logging configured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolled_log_file_path() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            rolled_log_file_path("logs/galactic-horizon.log", date),
            "logs/galactic-horizon-2024-01-31.log"
        );
        assert_eq!(rolled_log_file_path("logs/output", date), "logs/output-2024-01-31.log");
    }

    #[test]
    fn test_level_filter_falls_back_to_info() {
        assert_eq!(level_filter("DEBUG").to_string(), "debug");
        assert_eq!(level_filter("verbose").to_string(), "info");
    }
}
