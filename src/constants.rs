//! Lambdatronic Protocol Constants
//!
//! Command bytes, selectors and fixed payloads observed on the S3100
//! serial-over-socket link.

/// Header size: two command bytes plus the payload length byte.
pub const FRAME_HEADER_LEN: usize = 3;

/// Trailing big-endian checksum size.
pub const FRAME_CHECKSUM_LEN: usize = 2;

/// Largest payload the one-byte length field can describe.
pub const FRAME_MAX_PAYLOAD: usize = u8::MAX as usize;

/// Class byte of device-originated frames ('M').
pub const CLASS_DEVICE: u8 = 0x4D;

/// Class byte of host requests ('R').
pub const CLASS_REQUEST: u8 = 0x52;

// ----------------------------------------------------------------------------
// Device selectors (second command byte)
// ----------------------------------------------------------------------------

pub const SELECTOR_MEASUREMENTS: u8 = 0x31;
pub const SELECTOR_DATE_TIME: u8 = 0x32;
pub const SELECTOR_ERROR_MESSAGE: u8 = 0x33;
pub const SELECTOR_PARAMETER_NAME: u8 = 0x41;
pub const SELECTOR_DISPLAY_TEXT: u8 = 0x42;
pub const SELECTOR_PARAMETER_FORMAT: u8 = 0x43;

// ----------------------------------------------------------------------------
// Host requests
// ----------------------------------------------------------------------------

pub const SELECTOR_LOGIN: u8 = 0x61;
pub const SELECTOR_STATUS: u8 = 0x62;

/// Login payload for customer access.
pub const LOGIN_PAYLOAD_CUSTOMER: [u8; 3] = [0x00, 0x00, 0x01];

/// Login payload for service access.
pub const LOGIN_PAYLOAD_SERVICE: [u8; 3] = [0x00, 0xFF, 0xF9];

/// Status request payload.
pub const STATUS_PAYLOAD: [u8; 3] = [0x00, 0x00, 0x00];

/// Payload of an acknowledgement frame.
pub const ACK_PAYLOAD: [u8; 1] = [0x01];

// ----------------------------------------------------------------------------
// Catalog record tags
// ----------------------------------------------------------------------------

/// Parameter name record tag for numeric values ('I').
pub const NAME_KIND_VALUE: u8 = 0x49;

/// Parameter name record tag for display texts ('S').
pub const NAME_KIND_TEXT: u8 = 0x53;

/// Fixed size of a parameter format record.
pub const FORMAT_RECORD_LEN: usize = 8;

/// Fixed size of a date/time payload.
pub const DATE_TIME_PAYLOAD_LEN: usize = 7;

// ----------------------------------------------------------------------------
// Connection defaults
// ----------------------------------------------------------------------------

/// Port of the serial-over-socket bridge (telnet).
pub const DEFAULT_PORT: u16 = 23;

/// Read timeout for a single poll.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
