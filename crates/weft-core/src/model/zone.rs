use crate::{
    model::{Col, Layout, ZoneIntl},
    traits::{EntityKind, Path},
    types::{Id, Locale},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Zone
///
/// Horizontal strip within a Layout. `grid_map` is the computed column-id
/// to row-width-class mapping; it is never hand-edited, only replaced by
/// the partitioner when the recomputed value differs.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Zone {
    pub id: Id<Zone>,
    pub layout: Id<Layout>,
    pub position: u32,
    pub full_width: bool,
    pub padding: Option<String>,
    pub margin: Option<String>,
    pub background: Option<String>,
    pub grid_map: BTreeMap<Id<Col>, String>,
    pub intls: Vec<ZoneIntl>,
}

impl Zone {
    #[must_use]
    pub fn new(layout: Id<Layout>) -> Self {
        Self {
            id: Id::generate(),
            layout,
            position: 0,
            full_width: false,
            padding: None,
            margin: None,
            background: None,
            grid_map: BTreeMap::new(),
            intls: Vec::new(),
        }
    }

    #[must_use]
    pub fn intl(&self, locale: &Locale) -> Option<&ZoneIntl> {
        self.intls.iter().find(|intl| &intl.locale == locale)
    }
}

impl Path for Zone {
    const PATH: &'static str = "zone";
}

impl EntityKind for Zone {
    fn id(&self) -> Id<Self> {
        self.id
    }
}
