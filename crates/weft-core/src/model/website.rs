use crate::{
    MEDIA_SECONDARY_CAP,
    traits::{EntityKind, Path},
    types::{Id, Locale},
};
use serde::{Deserialize, Serialize};

///
/// Website
///
/// Owning site for layouts and pages. Carries the locale configuration the
/// synchronizer enforces and the media-secondary flag that raises the
/// per-locale media relation cap from 1 to 2.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Website {
    pub id: Id<Website>,
    pub name: String,
    pub locales: Vec<Locale>,
    pub default_locale: Locale,
    pub media_secondary: bool,
}

impl Website {
    #[must_use]
    pub fn new(name: impl Into<String>, locales: Vec<Locale>, default_locale: Locale) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            locales,
            default_locale,
            media_secondary: false,
        }
    }

    #[must_use]
    pub const fn media_secondary(mut self) -> Self {
        self.media_secondary = true;
        self
    }

    /// Media relation positions each locale must fill (1..=n).
    #[must_use]
    pub const fn media_positions(&self) -> u32 {
        if self.media_secondary {
            MEDIA_SECONDARY_CAP
        } else {
            1
        }
    }
}

impl Path for Website {
    const PATH: &'static str = "website";
}

impl EntityKind for Website {
    fn id(&self) -> Id<Self> {
        self.id
    }
}
