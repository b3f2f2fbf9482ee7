use crate::GRID_ROW_UNITS;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// WidthError
///

#[derive(Debug, ThisError)]
pub enum WidthError {
    #[error("column width out of range: {value} (expected 1..={GRID_ROW_UNITS})")]
    OutOfRange { value: u8 },
}

///
/// ColWidth
///
/// Bootstrap-style column width unit, 1..=12.
/// The form layer rejects anything else before it reaches the engine;
/// the type makes that unrepresentable here.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(transparent)]
pub struct ColWidth(u8);

impl ColWidth {
    pub const MIN: Self = Self(1);
    pub const FULL: Self = Self(GRID_ROW_UNITS);

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ColWidth {
    type Error = WidthError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 1 && value <= GRID_ROW_UNITS {
            Ok(Self(value))
        } else {
            Err(WidthError::OutOfRange { value })
        }
    }
}

impl From<ColWidth> for u8 {
    fn from(width: ColWidth) -> Self {
        width.0
    }
}
