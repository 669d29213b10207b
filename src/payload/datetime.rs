//! # Date/Time Decoding
//!
//! The M2 frame carries the controller clock as seven packed BCD bytes:
//! seconds, minutes, hours, day, month, weekday, year (offset from 2000).

use crate::constants::DATE_TIME_PAYLOAD_LEN;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Last clock value reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClockSnapshot {
    pub device_time: Option<NaiveDateTime>,
    /// `None` until the first valid date/time frame.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Decodes one packed BCD byte (high nibble tens, low nibble ones).
pub fn bcd(byte: u8) -> u32 {
    u32::from(byte >> 4) * 10 + u32::from(byte & 0x0F)
}

/// Decodes an M2 payload. Wrong lengths and impossible dates yield `None`.
pub fn decode_date_time(payload: &[u8]) -> Option<NaiveDateTime> {
    if payload.len() != DATE_TIME_PAYLOAD_LEN {
        return None;
    }

    let seconds = bcd(payload[0]);
    let minutes = bcd(payload[1]);
    let hours = bcd(payload[2]);
    let day = bcd(payload[3]);
    let month = bcd(payload[4]);
    // payload[5] is the weekday, implied by the date
    let year = 2000 + bcd(payload[6]) as i32;

    let decoded = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hours, minutes, seconds));
    if decoded.is_none() {
        log::warn!(
            "Ignoring invalid device clock {}",
            crate::util::hex::format_hex_compact(payload)
        );
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_bcd() {
        assert_eq!(bcd(0x00), 0);
        assert_eq!(bcd(0x15), 15);
        assert_eq!(bcd(0x59), 59);
    }

    #[test]
    fn test_decode_date_time() {
        let time = decode_date_time(&[0x15, 0x30, 0x10, 0x01, 0x05, 0x03, 0x24]).unwrap();
        assert_eq!(time.year(), 2024);
        assert_eq!(time.month(), 5);
        assert_eq!(time.day(), 1);
        assert_eq!(time.hour(), 10);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.second(), 15);
    }

    #[test]
    fn test_wrong_length_is_ignored() {
        assert!(decode_date_time(&[0x15, 0x30, 0x10, 0x01, 0x05, 0x03]).is_none());
        assert!(decode_date_time(&[]).is_none());
    }

    #[test]
    fn test_impossible_date_is_ignored() {
        // month 00
        assert!(decode_date_time(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x24]).is_none());
    }
}
