//! Weft — layout composition and duplication engine for page-builder CMSes.
//!
//! ## Crate layout
//! - `core`: the engine — tree model, grid row partitioning, ordered
//!   repositioning, subtree duplication, locale/media synchronization,
//!   and the session facade the host application drives.
//!
//! The `prelude` module mirrors the surface a host application uses to
//! serve editor requests.

pub use weft_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Host Prelude
///

pub mod prelude {
    pub use crate::core::{
        context::RequestContext,
        error::EngineError,
        interface::{Ack, AddedCol, AddedZone, DuplicateResponse, GridPreset},
        model::{Block, BlockContent, BlockKind, Col, Layout, Page, Website, Zone},
        session::{BootstrapIds, Session},
        store::{ActionTargetResolver, LocaleRegistry, MediaGateway, PageStore},
        types::{ColWidth, Id, Locale, Slug, Timestamp, Ulid},
    };
}
