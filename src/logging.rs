use env_logger::Env;
use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// `RUST_LOG` takes precedence; otherwise `info` is used. Calling this more than
/// once is harmless.
pub fn init_logger() {
    init_logger_with_level("info");
}

/// Initializes the logger with `default_level` unless `RUST_LOG` is set.
pub fn init_logger_with_level(default_level: &str) {
    if env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .try_init()
        .is_err()
    {
        debug!("Logger already initialized");
    }
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}
