//! # Lambdatronic Frame Codec
//!
//! This module encodes and decodes the checksummed frames exchanged with the
//! controller. Parsing uses the `nom` crate.
//!
//! ## Wire format
//!
//! ```text
//! byte 0-1        : command
//! byte 2          : payload length L
//! byte 3..3+L-1   : payload
//! byte 3+L..3+L+1 : checksum, big-endian
//! ```
//!
//! The checksum is the plain sum of every preceding byte truncated to 16 bits.
//!
//! ## Usage
//!
//! ```rust
//! use lambdatronic_rs::protocol::frame::{decode, encode};
//! use lambdatronic_rs::protocol::Command;
//!
//! let bytes = encode(Command::STATUS, &[0x00, 0x00, 0x00]).unwrap();
//! assert_eq!(bytes, [0x52, 0x62, 0x03, 0x00, 0x00, 0x00, 0x00, 0xB7]);
//!
//! let frame = decode(&bytes).unwrap();
//! assert_eq!(frame.command, Command::STATUS);
//! ```

use crate::constants::{ACK_PAYLOAD, FRAME_CHECKSUM_LEN, FRAME_HEADER_LEN, FRAME_MAX_PAYLOAD};
use crate::error::LambdaError;
use crate::protocol::command::Command;
use nom::{
    bytes::complete::take,
    number::complete::{be_u16, be_u8},
    sequence::tuple,
    IResult,
};

/// A decoded frame with a verified checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(command: Command, payload: Vec<u8>) -> Self {
        Frame { command, payload }
    }

    /// Acknowledgement for a received command: the command echoed with payload `01`.
    pub fn ack(command: Command) -> Self {
        Frame {
            command,
            payload: ACK_PAYLOAD.to_vec(),
        }
    }

    /// A bare ACK carries exactly one `0x01` byte.
    pub fn is_ack(&self) -> bool {
        self.payload == ACK_PAYLOAD
    }

    pub fn encode(&self) -> Result<Vec<u8>, LambdaError> {
        encode(self.command, &self.payload)
    }
}

/// Sums every byte, wrapping at 16 bits.
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
}

/// Builds `command ‖ length ‖ payload ‖ checksum`.
pub fn encode(command: Command, payload: &[u8]) -> Result<Vec<u8>, LambdaError> {
    if payload.len() > FRAME_MAX_PAYLOAD {
        return Err(LambdaError::PayloadTooLong(payload.len()));
    }

    let mut data = Vec::with_capacity(FRAME_HEADER_LEN + payload.len() + FRAME_CHECKSUM_LEN);
    data.extend_from_slice(&command.bytes());
    data.push(payload.len() as u8);
    data.extend_from_slice(payload);
    let sum = checksum(&data);
    data.extend_from_slice(&sum.to_be_bytes());
    Ok(data)
}

/// Number of bytes that follow a header: payload plus checksum.
pub fn body_len(header: &[u8; FRAME_HEADER_LEN]) -> usize {
    header[2] as usize + FRAME_CHECKSUM_LEN
}

/// Parses the 3-byte header into the command and declared payload length.
pub fn parse_header(input: &[u8]) -> IResult<&[u8], (Command, u8)> {
    let (input, (class, selector, length)) = tuple((be_u8, be_u8, be_u8))(input)?;
    Ok((input, (Command::new(class, selector), length)))
}

/// Parses a full frame without checking the checksum.
pub fn parse_frame(input: &[u8]) -> IResult<&[u8], (Command, &[u8], u16)> {
    let (input, (command, length)) = parse_header(input)?;
    let (input, payload) = take(length as usize)(input)?;
    let (input, received) = be_u16(input)?;
    Ok((input, (command, payload, received)))
}

/// Decodes and validates one complete raw frame.
pub fn decode(raw: &[u8]) -> Result<Frame, LambdaError> {
    let expected = match raw.get(2) {
        Some(length) => FRAME_HEADER_LEN + *length as usize + FRAME_CHECKSUM_LEN,
        None => FRAME_HEADER_LEN + FRAME_CHECKSUM_LEN,
    };
    let truncated = || LambdaError::FrameTruncated {
        expected,
        actual: raw.len(),
    };

    let (rest, (command, payload, received)) = parse_frame(raw).map_err(|_| truncated())?;
    if !rest.is_empty() {
        return Err(truncated());
    }

    let calculated = checksum(&raw[..raw.len() - FRAME_CHECKSUM_LEN]);
    if calculated != received {
        return Err(LambdaError::ChecksumInvalid {
            expected: received,
            calculated,
        });
    }

    Ok(Frame {
        command,
        payload: payload.to_vec(),
    })
}
