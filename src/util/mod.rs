//! # Utility Modules
//!
//! Hex formatting and frame logging helpers shared by the transport and the
//! protocol engine.

pub mod hex;
pub mod logging;

pub use self::hex::{decode_hex, format_hex_compact};
pub use self::logging::{log_frame_hex, LogThrottle};
