//! Unit tests for the `LambdaError` enum, its `Display` output and severity split.

use lambdatronic_rs::error::{LambdaError, Severity};

/// Tests that the `ChecksumInvalid` variant is correctly formatted.
#[test]
fn test_checksum_error() {
    let err = LambdaError::ChecksumInvalid {
        expected: 0x02AE,
        calculated: 0x02AF,
    };
    assert_eq!(
        err.to_string(),
        "Invalid checksum: expected 0x02AE, calculated 0x02AF"
    );
    assert_eq!(err.severity(), Severity::Recoverable);
}

/// Tests that the `PayloadLengthMismatch` variant is correctly formatted.
#[test]
fn test_length_mismatch_error() {
    let err = LambdaError::PayloadLengthMismatch {
        expected: 32,
        actual: 30,
    };
    assert_eq!(
        err.to_string(),
        "Measurement payload length mismatch: expected 32 bytes, got 30"
    );
    assert_eq!(err.severity(), Severity::Fatal);
}

/// Tests that the `InvalidMode` variant is correctly formatted.
#[test]
fn test_invalid_mode_error() {
    let err = LambdaError::InvalidMode("installer".to_string());
    assert_eq!(err.to_string(), "Mode 'installer' not available");
}

/// Tests that the `ConnectError` variant is correctly formatted.
#[test]
fn test_connect_error() {
    let err = LambdaError::ConnectError {
        target: "192.168.1.147:23".to_string(),
        reason: "timed out".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Failed to connect to 192.168.1.147:23: timed out"
    );
    assert!(err.is_fatal());
}

/// Tests that the timeout is never treated as a session failure.
#[test]
fn test_timeout_is_recoverable() {
    assert_eq!(LambdaError::Timeout.to_string(), "Read timed out");
    assert!(!LambdaError::Timeout.is_fatal());
}
