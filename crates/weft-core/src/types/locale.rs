use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// LocaleError
///

#[derive(Debug, ThisError)]
pub enum LocaleError {
    #[error("invalid locale code: '{code}'")]
    InvalidCode { code: String },
}

///
/// Locale
///
/// Website locale code ("fr", "en", "pt-br").
/// Trimmed and lowercased on construction.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(code: &str) -> Result<Self, LocaleError> {
        let trimmed = code.trim();

        let valid = (2..=8).contains(&trimmed.len())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(LocaleError::InvalidCode {
                code: code.to_string(),
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
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        let locale = Locale::new("  FR ").unwrap();
        assert_eq!(locale.as_str(), "fr");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Locale::new("").is_err());
        assert!(Locale::new("f").is_err());
        assert!(Locale::new("fr fr").is_err());
    }
}
