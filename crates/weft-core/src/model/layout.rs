use crate::{
    model::Website,
    traits::{EntityKind, Path},
    types::{Id, Timestamp, Ulid},
};
use serde::{Deserialize, Serialize};

///
/// Layout
///
/// Root container of the visual tree. Owns its Zones through their
/// back-pointers; decorated by at most one business entity at a time.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Layout {
    pub id: Id<Layout>,
    pub website: Id<Website>,
    pub name: String,
    pub attachment: Option<Attachment>,
    pub updated_at: Timestamp,
}

impl Layout {
    #[must_use]
    pub fn new(website: Id<Website>, name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            website,
            name: name.into(),
            attachment: None,
            updated_at: Timestamp::EPOCH,
        }
    }

    #[must_use]
    pub fn attached_to(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

impl Path for Layout {
    const PATH: &'static str = "layout";
}

impl EntityKind for Layout {
    fn id(&self) -> Id<Self> {
        self.id
    }
}

///
/// Attachment
///
/// Back-reference to whichever business entity the layout decorates.
/// The target id is raw: the decorated kinds live outside the engine.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub target: Ulid,
}

///
/// AttachmentKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AttachmentKind {
    Page,
    Form,
    NewsCategory,
}
