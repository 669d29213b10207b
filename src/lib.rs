//! # lambdatronic-rs - A Rust Crate for the Lambdatronic S3100 Protocol
//!
//! The lambdatronic-rs crate provides a client for the binary telemetry protocol
//! spoken by Lambdatronic S3100 heating controllers over a serial-over-socket
//! (TCP) bridge.
//!
//! ## Features
//!
//! - Connect to the controller's TCP bridge with short, cancel-safe read timeouts
//! - Encode and decode checksummed frames
//! - Log in as customer or service, acknowledge every received frame
//! - Build the self-describing parameter catalog the controller streams after login
//! - Decode measurement frames into named, scaled values and the BCD device clock
//! - Classify errors as recoverable or fatal so hosts know when to reconnect
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lambdatronic_rs::{open_session, ConnectionConfig, LoginMode};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), lambdatronic_rs::LambdaError> {
//! let mut engine = open_session(&ConnectionConfig::new("192.168.1.147", 23)).await?;
//! engine.bootstrap(LoginMode::Service, Duration::from_secs(120)).await?;
//! engine.drain().await?;
//! println!("{:?}", engine.values());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod payload;
pub mod protocol;
pub mod transport;
pub mod util;

pub use crate::config::{ConnectionConfig, SessionConfig};
pub use crate::error::{LambdaError, Severity};
pub use crate::logging::{init_logger, log_info};

// Core protocol types
pub use payload::{
    ClockSnapshot, ParameterCatalog, ParameterFormat, ParameterKind, ParameterName,
    ValueSnapshot,
};
pub use protocol::{Command, EngineStats, Frame, LoginMode, ProtocolEngine, Selector};
pub use transport::{connect, MockTransport, StreamTransport, TcpTransport, Transport};

/// Connect to the controller bridge and wrap the link in a fresh engine.
///
/// # Arguments
/// * `config` - Host, port and timeouts of the serial-over-socket bridge
///
/// # Returns
/// * `Ok(ProtocolEngine)` - Engine with an empty catalog, not yet logged in
/// * `Err(LambdaError)` - No resolved address could be connected
pub async fn open_session(
    config: &ConnectionConfig,
) -> Result<ProtocolEngine<TcpTransport>, LambdaError> {
    let transport = connect(config).await?;
    Ok(ProtocolEngine::new(transport))
}
