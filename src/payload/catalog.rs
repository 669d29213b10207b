//! # Parameter Catalog
//!
//! The controller announces its parameters before sending any measurement: one
//! name record (MA) per parameter, and one format record (MC) per parameter index.
//! Measurement slots line up with the *order* in which names were announced,
//! not with the device index, so names are kept as an append-only list while
//! formats are keyed by index.

use crate::constants::{
    FORMAT_RECORD_LEN, NAME_KIND_TEXT, NAME_KIND_VALUE, SELECTOR_PARAMETER_FORMAT,
    SELECTOR_PARAMETER_NAME,
};
use crate::error::LambdaError;
use crate::payload::cp850;
use nom::{
    combinator::rest,
    number::complete::{be_u16, be_u8},
    sequence::tuple,
    IResult,
};
use serde::Serialize;
use std::collections::HashMap;

/// What a parameter slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Signed 16-bit reading scaled by the format divisor.
    Value,
    /// Display text reference.
    Text,
    Other,
}

impl From<u8> for ParameterKind {
    fn from(tag: u8) -> Self {
        match tag {
            NAME_KIND_VALUE => ParameterKind::Value,
            NAME_KIND_TEXT => ParameterKind::Text,
            _ => ParameterKind::Other,
        }
    }
}

/// One announced parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterName {
    pub index: u16,
    pub kind: ParameterKind,
    /// Undocumented; passed through untouched.
    pub reserved: u16,
    pub name: String,
}

impl ParameterName {
    /// Parses an MA payload: kind tag, index, reserved word, CP850 name.
    pub fn parse(payload: &[u8]) -> Result<Self, LambdaError> {
        parse_name_record(payload)
            .map(|(_, name)| name)
            .map_err(|_| LambdaError::MalformedRecord {
                selector: SELECTOR_PARAMETER_NAME,
                length: payload.len(),
            })
    }
}

/// Scaling and presentation of one parameter index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterFormat {
    pub unit: String,
    /// Presentation only; never applied to stored values.
    pub num_decimals: u8,
    pub divisor: u16,
    /// Undocumented; passed through untouched.
    pub reserved: u16,
}

impl ParameterFormat {
    /// Parses an MC payload into the index it describes and its format.
    pub fn parse(payload: &[u8]) -> Result<(u16, Self), LambdaError> {
        let malformed = || LambdaError::MalformedRecord {
            selector: SELECTOR_PARAMETER_FORMAT,
            length: payload.len(),
        };
        if payload.len() != FORMAT_RECORD_LEN {
            return Err(malformed());
        }
        parse_format_record(payload)
            .map(|(_, record)| record)
            .map_err(|_| malformed())
    }
}

fn parse_name_record(input: &[u8]) -> IResult<&[u8], ParameterName> {
    let (input, (tag, index, reserved)) = tuple((be_u8, be_u16, be_u16))(input)?;
    let (input, text) = rest(input)?;
    Ok((
        input,
        ParameterName {
            index,
            kind: ParameterKind::from(tag),
            reserved,
            name: cp850::decode(text).trim().to_string(),
        },
    ))
}

fn parse_format_record(input: &[u8]) -> IResult<&[u8], (u16, ParameterFormat)> {
    let (input, (index, unit, num_decimals, divisor, reserved)) =
        tuple((be_u16, be_u8, be_u8, be_u16, be_u16))(input)?;
    Ok((
        input,
        (
            index,
            ParameterFormat {
                unit: cp850::decode_char(unit).to_string(),
                num_decimals,
                divisor,
                reserved,
            },
        ),
    ))
}

/// Names and formats announced during one session.
#[derive(Debug, Clone, Default)]
pub struct ParameterCatalog {
    names: Vec<ParameterName>,
    formats: HashMap<u16, ParameterFormat>,
}

impl ParameterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a name. Duplicate indices are kept; each takes its own slot.
    pub fn record_name(&mut self, entry: ParameterName) {
        self.names.push(entry);
    }

    /// Inserts or replaces the format for `index`.
    pub fn record_format(&mut self, index: u16, format: ParameterFormat) {
        self.formats.insert(index, format);
    }

    /// Name and format for the parameter announced at `ordinal`.
    pub fn resolve(&self, ordinal: usize) -> Result<(&ParameterName, &ParameterFormat), LambdaError> {
        let name = self
            .names
            .get(ordinal)
            .ok_or(LambdaError::CatalogIncomplete {
                ordinal,
                index: None,
            })?;
        let format = self
            .formats
            .get(&name.index)
            .ok_or(LambdaError::CatalogIncomplete {
                ordinal,
                index: Some(name.index),
            })?;
        Ok((name, format))
    }

    /// Number of announced names, i.e. measurement slots.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in announcement order.
    pub fn names(&self) -> &[ParameterName] {
        &self.names
    }

    pub fn format(&self, index: u16) -> Option<&ParameterFormat> {
        self.formats.get(&index)
    }

    /// Every announced name together with its format, if known.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &ParameterName, Option<&ParameterFormat>)> {
        self.names
            .iter()
            .enumerate()
            .map(move |(ordinal, name)| (ordinal, name, self.formats.get(&name.index)))
    }

    /// True when every announced name has a format.
    pub fn is_complete(&self) -> bool {
        self.names
            .iter()
            .all(|name| self.formats.contains_key(&name.index))
    }

    /// Drops everything. Only used when a new session starts.
    pub fn reset(&mut self) {
        self.names.clear();
        self.formats.clear();
    }
}
