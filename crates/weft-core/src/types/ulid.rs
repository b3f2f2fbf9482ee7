use derive_more::{Deref, Display, From, FromStr};
use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, Mutex};
use thiserror::Error as ThisError;
use ulid::Ulid as WrappedUlid;

///
/// UlidError
///

#[derive(Debug, ThisError)]
pub enum UlidError {
    #[error("monotonic error - overflow")]
    GeneratorOverflow,
}

///
/// Ulid
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deref,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[repr(transparent)]
pub struct Ulid(WrappedUlid);

impl Ulid {
    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(WrappedUlid::from_parts(timestamp_ms, random))
    }

    /// generate
    /// Generate a ULID with the current timestamp and a random value.
    /// Falls back to nil on generator overflow.
    #[must_use]
    pub fn generate() -> Self {
        Self::try_generate().unwrap_or_else(|_| Self::nil())
    }

    /// try_generate
    /// Fallible ULID generation preserving error type (e.g., overflow).
    pub fn try_generate() -> Result<Self, UlidError> {
        let mut generator = GENERATOR.lock().expect("ULID generator mutex poisoned");

        generator.generate()
    }

    /// Monotonic increment; returns `None` on overflow.
    #[must_use]
    pub fn increment(&self) -> Option<Self> {
        self.0.increment().map(Self::from)
    }
}

///
/// GENERATOR is lazily initiated with a Mutex
/// it has to keep state to make sure key order is maintained
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::default()));

///
/// Generator
///
/// Monotonic within a process: a candidate landing in the same millisecond
/// as the previous key increments it instead of rolling new randomness.
///

#[derive(Default)]
struct Generator {
    previous: Option<Ulid>,
}

impl Generator {
    fn generate(&mut self) -> Result<Ulid, UlidError> {
        let candidate = Ulid(WrappedUlid::new());

        if let Some(previous) = self.previous {
            // maybe time went backward, or it is the same ms.
            // increment instead of generating a new random so that it is monotonic
            if candidate.timestamp_ms() <= previous.timestamp_ms() {
                let next = previous.increment().ok_or(UlidError::GeneratorOverflow)?;
                self.previous = Some(next);

                return Ok(next);
            }
        }

        self.previous = Some(candidate);

        Ok(candidate)
    }
}

///
/// TESTS
///
