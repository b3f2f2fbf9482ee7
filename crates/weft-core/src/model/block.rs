use crate::{
    model::{ActionIntl, BlockIntl, Col, FieldConfig, MediaRelation},
    traits::{EntityKind, Path},
    types::{Id, Locale},
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Block
///
/// Leaf content unit. The content variant is selected by the block kind;
/// each variant carries only the fields relevant to that kind.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Block {
    pub id: Id<Block>,
    pub col: Id<Col>,
    pub position: u32,
    pub intls: Vec<BlockIntl>,
    pub content: BlockContent,
}

impl Block {
    #[must_use]
    pub fn new(col: Id<Col>, content: BlockContent) -> Self {
        Self {
            id: Id::generate(),
            col,
            position: 0,
            intls: Vec::new(),
            content,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    #[must_use]
    pub fn intl(&self, locale: &Locale) -> Option<&BlockIntl> {
        self.intls.iter().find(|intl| &intl.locale == locale)
    }
}

impl Path for Block {
    const PATH: &'static str = "block";
}

impl EntityKind for Block {
    fn id(&self) -> Id<Self> {
        self.id
    }
}

///
/// BlockContent
///
/// Tagged union of per-kind payloads.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum BlockContent {
    Text,
    Media { relations: Vec<MediaRelation> },
    Card { relations: Vec<MediaRelation> },
    FormField { config: FieldConfig },
    Action { intls: Vec<ActionIntl> },
}

impl BlockContent {
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Text => BlockKind::Text,
            Self::Media { .. } => BlockKind::Media,
            Self::Card { .. } => BlockKind::Card,
            Self::FormField { .. } => BlockKind::FormField,
            Self::Action { .. } => BlockKind::Action,
        }
    }

    /// Media relations, for the kinds that carry them.
    #[must_use]
    pub const fn relations(&self) -> Option<&Vec<MediaRelation>> {
        match self {
            Self::Media { relations } | Self::Card { relations } => Some(relations),
            _ => None,
        }
    }

    pub(crate) const fn relations_mut(&mut self) -> Option<&mut Vec<MediaRelation>> {
        match self {
            Self::Media { relations } | Self::Card { relations } => Some(relations),
            _ => None,
        }
    }

    #[must_use]
    pub const fn action_intls(&self) -> Option<&Vec<ActionIntl>> {
        match self {
            Self::Action { intls } => Some(intls),
            _ => None,
        }
    }

    pub(crate) const fn action_intls_mut(&mut self) -> Option<&mut Vec<ActionIntl>> {
        match self {
            Self::Action { intls } => Some(intls),
            _ => None,
        }
    }

    pub(crate) const fn field_config_mut(&mut self) -> Option<&mut FieldConfig> {
        match self {
            Self::FormField { config } => Some(config),
            _ => None,
        }
    }
}

///
/// BlockKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BlockKind {
    Text,
    Media,
    Card,
    FormField,
    Action,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Media => "media",
            Self::Card => "card",
            Self::FormField => "form_field",
            Self::Action => "action",
        };
        write!(f, "{label}")
    }
}
