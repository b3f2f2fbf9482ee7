use crate::{
    model::Zone,
    traits::{EntityKind, Path},
    types::{ColWidth, Id},
};
use serde::{Deserialize, Serialize};

///
/// Col
///
/// Column within a Zone, 1..=12 width units wide.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Col {
    pub id: Id<Col>,
    pub zone: Id<Zone>,
    pub position: u32,
    pub width: ColWidth,
    pub background: Option<String>,
    /// Forces all child Blocks to render at equal width.
    pub standardize_blocks: bool,
}

impl Col {
    #[must_use]
    pub fn new(zone: Id<Zone>, width: ColWidth) -> Self {
        Self {
            id: Id::generate(),
            zone,
            position: 0,
            width,
            background: None,
            standardize_blocks: false,
        }
    }
}

impl Path for Col {
    const PATH: &'static str = "col";
}

impl EntityKind for Col {
    fn id(&self) -> Id<Self> {
        self.id
    }
}
