//! # Payload Decoding
//!
//! Interpretation of frame payloads: the parameter catalog built from name and
//! format records, measurement slots, the BCD device clock, and CP850 text.

pub mod catalog;
pub mod cp850;
pub mod datetime;
pub mod measurement;

pub use catalog::{ParameterCatalog, ParameterFormat, ParameterKind, ParameterName};
pub use datetime::{decode_date_time, ClockSnapshot};
pub use measurement::{decode_measurements, ValueSnapshot};
