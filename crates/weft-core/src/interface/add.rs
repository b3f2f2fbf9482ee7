//! Add endpoint contract: a destination parent plus optional structural
//! metadata (a grid preset expanding into N Cols), defaulting to one
//! full-width Col/Block. The response carries the created subtree's
//! minimal identifiers.

use crate::{
    error::EngineError,
    model::{Block, Col, Zone},
    types::{ColWidth, Id},
};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// PresetError
///

#[derive(Debug, ThisError)]
pub enum PresetError {
    #[error("empty grid preset")]
    Empty,

    #[error("bad width '{part}' in grid preset '{raw}'")]
    BadWidth { raw: String, part: String },
}

impl From<PresetError> for EngineError {
    fn from(err: PresetError) -> Self {
        Self::interface_unsupported(err.to_string())
    }
}

///
/// GridPreset
///
/// Editor-chosen column layout, "6-4-2" on the wire.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridPreset(Vec<ColWidth>);

impl GridPreset {
    pub fn parse(raw: &str) -> Result<Self, PresetError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PresetError::Empty);
        }

        let widths = trimmed
            .split('-')
            .map(|part| {
                part.trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(|value| ColWidth::try_from(value).ok())
                    .ok_or_else(|| PresetError::BadWidth {
                        raw: raw.to_string(),
                        part: part.to_string(),
                    })
            })
            .collect::<Result<Vec<ColWidth>, PresetError>>()?;

        Ok(Self(widths))
    }

    #[must_use]
    pub fn widths(&self) -> &[ColWidth] {
        &self.0
    }
}

impl FromStr for GridPreset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// AddedCol
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AddedCol {
    pub col: Id<Col>,
    pub block: Id<Block>,
}

///
/// AddedZone
///

#[derive(Clone, Debug, Serialize)]
pub struct AddedZone {
    pub zone: Id<Zone>,
    pub cols: Vec<AddedCol>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_round_trip() {
        let preset = GridPreset::parse("6-4-2").unwrap();
        let widths: Vec<u8> = preset.widths().iter().map(|w| w.get()).collect();

        assert_eq!(widths, vec![6, 4, 2]);
    }

    #[test]
    fn preset_rejects_out_of_range() {
        assert!(matches!(GridPreset::parse(""), Err(PresetError::Empty)));
        assert!(matches!(
            GridPreset::parse("6-0"),
            Err(PresetError::BadWidth { .. })
        ));
        assert!(matches!(
            GridPreset::parse("13"),
            Err(PresetError::BadWidth { .. })
        ));
        assert!(matches!(
            GridPreset::parse("6-x"),
            Err(PresetError::BadWidth { .. })
        ));
    }
}
