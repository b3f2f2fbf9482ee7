use crate::{
    model::{Layout, PageAlias, Website},
    traits::{EntityKind, Path},
    types::{Id, Locale, Slug, Timestamp},
};
use serde::{Deserialize, Serialize};

///
/// Page
///
/// The canonical business entity a Layout decorates. Pages nest under a
/// parent page independently of the layout tree; `level` and `position`
/// are re-derived when a page is duplicated into a new parent.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Page {
    pub id: Id<Page>,
    pub website: Id<Website>,
    pub parent: Option<Id<Page>>,
    pub level: u32,
    pub position: u32,
    pub name: String,
    pub slug: Slug,
    pub aliases: Vec<PageAlias>,
    pub layout: Id<Layout>,
    pub updated_at: Timestamp,
}

impl Page {
    #[must_use]
    pub fn alias(&self, locale: &Locale) -> Option<&PageAlias> {
        self.aliases.iter().find(|alias| &alias.locale == locale)
    }
}

impl Path for Page {
    const PATH: &'static str = "page";
}

impl EntityKind for Page {
    fn id(&self) -> Id<Self> {
        self.id
    }
}
