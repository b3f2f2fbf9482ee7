//! Core runtime for Weft: the layout ownership tree, grid row partitioning,
//! ordered repositioning, subtree duplication, and locale synchronization.

// public exports are one module level down
pub mod context;
pub mod duplicate;
pub mod error;
pub mod grid;
pub mod interface;
pub mod model;
pub mod obs;
pub mod position;
pub mod session;
pub mod store;
pub mod sync;
pub mod traits;
pub mod tree;
pub mod types;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum visual width units a single grid row can carry.
///
/// Columns whose running width total would exceed this start a new row;
/// the partitioner never emits a row summing past it.
pub const GRID_ROW_UNITS: u8 = 12;

/// Media relations a single locale may carry on a media-secondary website.
///
/// Regular websites carry exactly one; anything beyond the cap is pruned
/// by the locale synchronizer.
pub const MEDIA_SECONDARY_CAP: u32 = 2;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, transactions, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        context::RequestContext,
        model::{Block, BlockContent, BlockKind, Col, Layout, Page, Website, Zone},
        traits::{EntityKind, Path},
        types::{ColWidth, Id, Locale, Slug, Timestamp, Ulid},
    };
}
