use crate::{
    model::{ActionTarget, MediaAsset},
    types::{Id, Locale, Slug},
};
use serde::{Deserialize, Serialize};

///
/// ZoneIntl
///
/// Locale-scoped translatable fields of a Zone.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ZoneIntl {
    pub locale: Locale,
    pub heading: Option<String>,
    pub intro: Option<String>,
}

impl ZoneIntl {
    #[must_use]
    pub const fn empty(locale: Locale) -> Self {
        Self {
            locale,
            heading: None,
            intro: None,
        }
    }

    #[must_use]
    pub const fn has_content(&self) -> bool {
        self.heading.is_some() || self.intro.is_some()
    }
}

///
/// BlockIntl
///
/// Locale-scoped translatable content of a Block.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BlockIntl {
    pub locale: Locale,
    pub heading: Option<String>,
    pub body: Option<String>,
}

impl BlockIntl {
    #[must_use]
    pub const fn empty(locale: Locale) -> Self {
        Self {
            locale,
            heading: None,
            body: None,
        }
    }

    #[must_use]
    pub const fn has_content(&self) -> bool {
        self.heading.is_some() || self.body.is_some()
    }
}

///
/// MediaRelation
///
/// Locale- and position-scoped reference to a media asset.
/// Position is 1, or 1..=2 on media-secondary websites.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MediaRelation {
    pub locale: Locale,
    pub position: u32,
    pub media: Option<Id<MediaAsset>>,
}

impl MediaRelation {
    #[must_use]
    pub const fn empty(locale: Locale, position: u32) -> Self {
        Self {
            locale,
            position,
            media: None,
        }
    }
}

///
/// ActionIntl
///
/// Locale-scoped action link. The filter identifies the target entity and
/// is only valid within the website it was written against; cross-website
/// duplication re-resolves it by slug or clears it.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ActionIntl {
    pub locale: Locale,
    pub label: Option<String>,
    pub action_filter: Option<Id<ActionTarget>>,
}

impl ActionIntl {
    #[must_use]
    pub const fn empty(locale: Locale) -> Self {
        Self {
            locale,
            label: None,
            action_filter: None,
        }
    }

    #[must_use]
    pub const fn has_content(&self) -> bool {
        self.label.is_some() || self.action_filter.is_some()
    }
}

///
/// FieldConfig
///
/// Form-field configuration carried by form-field blocks.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FieldConfig {
    pub required: bool,
    pub expanded: bool,
    pub multiple: bool,
    pub values: Vec<FieldValue>,
}

///
/// FieldValue
///
/// One ordered choice of a form field.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldValue {
    pub position: u32,
    pub intls: Vec<FieldValueIntl>,
}

///
/// FieldValueIntl
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldValueIntl {
    pub locale: Locale,
    pub label: Option<String>,
}

impl FieldValueIntl {
    #[must_use]
    pub const fn empty(locale: Locale) -> Self {
        Self {
            locale,
            label: None,
        }
    }
}

///
/// PageAlias
///
/// Locale-scoped URL alias of a Page, unique per (website, locale).
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PageAlias {
    pub locale: Locale,
    pub alias: Slug,
}
