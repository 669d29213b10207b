//! # Measurement Decoding
//!
//! An M1 payload carries one big-endian 2-byte slot per announced parameter name,
//! in announcement order. Value slots are signed readings divided by the
//! parameter's divisor; text slots are skipped.

use crate::error::LambdaError;
use crate::payload::catalog::{ParameterCatalog, ParameterKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of one measurement slot.
pub const SLOT_LEN: usize = 2;

/// Latest decoded measurement values, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueSnapshot {
    pub values: BTreeMap<String, f64>,
    /// `None` until the first measurement frame was decoded.
    pub last_updated: Option<DateTime<Utc>>,
}

impl ValueSnapshot {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Decodes an M1 payload against the catalog.
///
/// The full map is built before returning, so callers can replace their snapshot
/// only on success.
pub fn decode_measurements(
    payload: &[u8],
    catalog: &ParameterCatalog,
) -> Result<BTreeMap<String, f64>, LambdaError> {
    let expected = SLOT_LEN * catalog.len();
    if payload.len() != expected {
        return Err(LambdaError::PayloadLengthMismatch {
            expected,
            actual: payload.len(),
        });
    }

    let mut values = BTreeMap::new();
    for (ordinal, (slot, name)) in payload
        .chunks_exact(SLOT_LEN)
        .zip(catalog.names())
        .enumerate()
    {
        if name.kind != ParameterKind::Value {
            log::trace!("Skipping {:?} parameter '{}'", name.kind, name.name);
            continue;
        }

        let (name, format) = catalog.resolve(ordinal)?;
        if format.divisor == 0 {
            return Err(LambdaError::InvalidFormat { index: name.index });
        }

        let raw = i16::from_be_bytes([slot[0], slot[1]]);
        values.insert(name.name.clone(), f64::from(raw) / f64::from(format.divisor));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::catalog::{ParameterFormat, ParameterName};

    fn catalog_with(entries: &[(u16, ParameterKind, &str, Option<u16>)]) -> ParameterCatalog {
        let mut catalog = ParameterCatalog::new();
        for (index, kind, name, divisor) in entries {
            catalog.record_name(ParameterName {
                index: *index,
                kind: *kind,
                reserved: 0,
                name: name.to_string(),
            });
            if let Some(divisor) = divisor {
                catalog.record_format(
                    *index,
                    ParameterFormat {
                        unit: "°".to_string(),
                        num_decimals: 1,
                        divisor: *divisor,
                        reserved: 0,
                    },
                );
            }
        }
        catalog
    }

    #[test]
    fn test_decode_single_value() {
        let catalog = catalog_with(&[(0, ParameterKind::Value, "Kesseltemp", Some(10))]);
        let values = decode_measurements(&[0x00, 0x64], &catalog).unwrap();
        assert_eq!(values.get("Kesseltemp"), Some(&10.0));
    }

    #[test]
    fn test_decode_negative_reading() {
        let catalog = catalog_with(&[(4, ParameterKind::Value, "Außentemp", Some(2))]);
        let values = decode_measurements(&[0xFF, 0xF6], &catalog).unwrap();
        assert_eq!(values.get("Außentemp"), Some(&-5.0));
    }

    #[test]
    fn test_text_slot_is_skipped_without_format() {
        let catalog = catalog_with(&[
            (0, ParameterKind::Text, "Zustand", None),
            (1, ParameterKind::Value, "Saugzug", Some(1)),
        ]);
        let values = decode_measurements(&[0x00, 0x05, 0x00, 0x2A], &catalog).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("Saugzug"), Some(&42.0));
    }

    #[test]
    fn test_other_slot_is_skipped_without_format() {
        let catalog = catalog_with(&[
            (0, ParameterKind::Other, "Reserve", None),
            (1, ParameterKind::Value, "K", Some(4)),
        ]);
        let values = decode_measurements(&[0x12, 0x34, 0x80, 0x00], &catalog).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("K"), Some(&-8192.0));
    }

    #[test]
    fn test_length_mismatch() {
        let catalog = catalog_with(&[(0, ParameterKind::Value, "Kesseltemp", Some(10))]);
        let err = decode_measurements(&[0x00, 0x64, 0x00], &catalog).unwrap_err();
        assert!(matches!(
            err,
            LambdaError::PayloadLengthMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_zero_divisor() {
        let catalog = catalog_with(&[(9, ParameterKind::Value, "Rest-O2", Some(0))]);
        let err = decode_measurements(&[0x00, 0x01], &catalog).unwrap_err();
        assert!(matches!(err, LambdaError::InvalidFormat { index: 9 }));
    }

    #[test]
    fn test_missing_format() {
        let catalog = catalog_with(&[(2, ParameterKind::Value, "Prim.Luft", None)]);
        let err = decode_measurements(&[0x00, 0x01], &catalog).unwrap_err();
        assert!(matches!(
            err,
            LambdaError::CatalogIncomplete {
                ordinal: 0,
                index: Some(2)
            }
        ));
    }
}
