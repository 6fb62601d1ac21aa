//! Logging configuration constants

/// Default log level when not specified
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log format when not specified
pub const DEFAULT_LOG_FORMAT: &str = "compact";

/// Default log mode when not specified
pub const DEFAULT_LOG_MODE: &str = "stdout";

/// Default log directory for file logging
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Log file name
pub const LOG_FILE_NAME: &str = "galactic-horizon.log";
