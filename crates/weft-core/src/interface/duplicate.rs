//! Duplicate endpoint contract: source subtree id plus a destination
//! descriptor; the response carries the new root id and, for cross-website
//! copies, whether each action reference was re-targeted or cleared.

use crate::{
    duplicate::{ActionRemap, Duplicated},
    types::Ulid,
};
use serde::Serialize;

///
/// DuplicateResponse
///

#[derive(Clone, Debug, Serialize)]
pub struct DuplicateResponse {
    pub root: Ulid,
    pub remaps: Vec<ActionRemap>,
}

impl DuplicateResponse {
    #[must_use]
    pub fn from_duplicated<E>(duplicated: Duplicated<E>) -> Self {
        Self {
            root: duplicated.root.ulid(),
            remaps: duplicated.remaps,
        }
    }
}
