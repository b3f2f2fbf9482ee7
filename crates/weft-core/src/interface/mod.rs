//! Wire contracts for the editor-facing endpoints. Routing, auth, and the
//! HTTP layer live outside the engine; these types define what crosses
//! the boundary.

pub mod add;
pub mod duplicate;
pub mod reposition;

pub use add::{AddedCol, AddedZone, GridPreset, PresetError};
pub use duplicate::DuplicateResponse;
pub use reposition::{RawMove, RepositionParseError};

use serde::{Deserialize, Serialize};

///
/// Ack
///
/// Minimal success acknowledgement, `{ "success": true }` on the wire.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
