//! # Lambdatronic Error Handling
//!
//! This module defines the `LambdaError` enum, which represents the different error
//! types that can occur in the lambdatronic-rs crate, and the `Severity` split that
//! tells a host whether a session can continue or must be torn down.

use thiserror::Error;

/// Whether an error leaves the session usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The frame (or poll) is lost but the stream is still aligned.
    Recoverable,
    /// Stream and catalog have diverged; reconnect and rebuild the catalog.
    Fatal,
}

/// Represents the different error types that can occur in the crate.
#[derive(Debug, Error)]
pub enum LambdaError {
    /// Indicates a frame whose trailing checksum does not match its contents.
    #[error("Invalid checksum: expected 0x{expected:04X}, calculated 0x{calculated:04X}")]
    ChecksumInvalid { expected: u16, calculated: u16 },

    /// Indicates a raw frame shorter or longer than its header declares.
    #[error("Frame truncated: expected {expected} bytes, got {actual}")]
    FrameTruncated { expected: usize, actual: usize },

    /// No data arrived within the read timeout.
    #[error("Read timed out")]
    Timeout,

    /// Indicates a measurement frame that does not match the announced catalog.
    #[error("Measurement payload length mismatch: expected {expected} bytes, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },

    /// Indicates a parameter format with a zero divisor.
    #[error("Invalid format for parameter index {index}: divisor is zero")]
    InvalidFormat { index: u16 },

    /// Indicates a named parameter whose format has not been announced.
    #[error("Catalog incomplete: no format for ordinal {ordinal} (index {index:?})")]
    CatalogIncomplete { ordinal: usize, index: Option<u16> },

    /// Indicates a name or format record that cannot be parsed.
    #[error("Malformed record for selector 0x{selector:02X} ({length} bytes)")]
    MalformedRecord { selector: u8, length: usize },

    /// The peer closed the connection.
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// The device never sent its date/time frame after login.
    #[error("Handshake did not complete in time")]
    HandshakeTimeout,

    /// No resolved address could be connected.
    #[error("Failed to connect to {target}: {reason}")]
    ConnectError { target: String, reason: String },

    /// Underlying socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Indicates an unknown login mode.
    #[error("Mode '{0}' not available")]
    InvalidMode(String),

    /// Indicates a payload that does not fit the one-byte length field.
    #[error("Payload too long: {0} bytes (max 255)")]
    PayloadTooLong(usize),
}

impl LambdaError {
    /// Classifies the error for the host's teardown decision.
    pub fn severity(&self) -> Severity {
        match self {
            LambdaError::ChecksumInvalid { .. }
            | LambdaError::FrameTruncated { .. }
            | LambdaError::Timeout => Severity::Recoverable,
            LambdaError::PayloadLengthMismatch { .. }
            | LambdaError::InvalidFormat { .. }
            | LambdaError::CatalogIncomplete { .. }
            | LambdaError::MalformedRecord { .. }
            | LambdaError::ConnectionClosed
            | LambdaError::HandshakeTimeout
            | LambdaError::ConnectError { .. }
            | LambdaError::Io(_)
            | LambdaError::InvalidMode(_)
            | LambdaError::PayloadTooLong(_) => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
