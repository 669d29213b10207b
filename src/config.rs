//! Connection and session settings.

use crate::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS};
use crate::protocol::command::LoginMode;
use std::time::Duration;

/// Where the serial-over-socket bridge lives and how long to wait on it.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Bound on every individual read; a poll never blocks longer.
    pub read_timeout: Duration,
    /// Bound on each connection attempt per resolved address.
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ConnectionConfig {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }
}

/// How a host drives one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: LoginMode,
    /// Give up waiting for the date/time frame after this long.
    pub handshake_deadline: Duration,
    /// Tick period between drains.
    pub poll_interval: Duration,
    /// Pause before reconnecting after a fatal error.
    pub retry_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: LoginMode::Service,
            handshake_deadline: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
            retry_delay: Duration::from_secs(20),
        }
    }
}
