use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// SlugError
///

#[derive(Debug, ThisError)]
pub enum SlugError {
    #[error("invalid slug: '{raw}'")]
    Invalid { raw: String },
}

///
/// Slug
///
/// Natural key for URL aliases and cross-website action lookups.
/// Lowercase ASCII, digits, '-' and '_' only.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(raw: &str) -> Result<Self, SlugError> {
        let trimmed = raw.trim();

        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SlugError::Invalid {
                raw: raw.to_string(),
            });
        }

        let mut value = trimmed.to_owned();
        value.make_ascii_lowercase();

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a collision-breaking variant ("offre-1" -> "offre-1-2").
    #[must_use]
    pub(crate) fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
