//! # Command Vocabulary
//!
//! Two-byte command codes, the selector table the engine dispatches on, and the
//! login modes accepted by the controller.

use crate::constants::{
    CLASS_DEVICE, CLASS_REQUEST, LOGIN_PAYLOAD_CUSTOMER, LOGIN_PAYLOAD_SERVICE,
    SELECTOR_DATE_TIME, SELECTOR_DISPLAY_TEXT, SELECTOR_ERROR_MESSAGE, SELECTOR_LOGIN,
    SELECTOR_MEASUREMENTS, SELECTOR_PARAMETER_FORMAT, SELECTOR_PARAMETER_NAME, SELECTOR_STATUS,
};
use crate::error::LambdaError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The two command bytes at the start of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Command(pub [u8; 2]);

impl Command {
    /// Host login request ("Ra").
    pub const LOGIN: Command = Command([CLASS_REQUEST, SELECTOR_LOGIN]);

    /// Host status request ("Rb").
    pub const STATUS: Command = Command([CLASS_REQUEST, SELECTOR_STATUS]);

    pub fn new(class: u8, selector: u8) -> Self {
        Command([class, selector])
    }

    /// First byte: protocol class marker.
    pub fn class(&self) -> u8 {
        self.0[0]
    }

    /// Second byte: what the frame carries.
    pub fn selector(&self) -> u8 {
        self.0[1]
    }

    pub fn bytes(&self) -> [u8; 2] {
        self.0
    }

    /// True for frames sent by the controller ('M' class).
    pub fn is_device(&self) -> bool {
        self.class() == CLASS_DEVICE
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic()) {
            write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
        } else {
            write!(f, "{:02X}{:02X}", self.0[0], self.0[1])
        }
    }
}

/// Decoded meaning of a device selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// M1: one 2-byte slot per announced parameter.
    Measurements,
    /// M2: BCD date/time, also the end of the catalog handshake.
    DateTime,
    /// M3: error message.
    ErrorMessage,
    /// MA: parameter name record.
    ParameterName,
    /// MB: display text.
    DisplayText,
    /// MC: parameter format record.
    ParameterFormat,
    Unsupported(u8),
}

impl From<u8> for Selector {
    fn from(byte: u8) -> Self {
        match byte {
            SELECTOR_MEASUREMENTS => Selector::Measurements,
            SELECTOR_DATE_TIME => Selector::DateTime,
            SELECTOR_ERROR_MESSAGE => Selector::ErrorMessage,
            SELECTOR_PARAMETER_NAME => Selector::ParameterName,
            SELECTOR_DISPLAY_TEXT => Selector::DisplayText,
            SELECTOR_PARAMETER_FORMAT => Selector::ParameterFormat,
            other => Selector::Unsupported(other),
        }
    }
}

/// Access level requested at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    Customer,
    #[default]
    Service,
}

impl LoginMode {
    /// Login frame payload for this mode.
    pub fn payload(&self) -> [u8; 3] {
        match self {
            LoginMode::Customer => LOGIN_PAYLOAD_CUSTOMER,
            LoginMode::Service => LOGIN_PAYLOAD_SERVICE,
        }
    }
}

impl FromStr for LoginMode {
    type Err = LambdaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(LoginMode::Customer),
            "service" => Ok(LoginMode::Service),
            _ => Err(LambdaError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for LoginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginMode::Customer => f.write_str("customer"),
            LoginMode::Service => f.write_str("service"),
        }
    }
}
