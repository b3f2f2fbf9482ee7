use crate::types::Id;

///
/// Path
///
/// Stable lowercase name for an addressable kind, used in error
/// messages and diagnostics.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// EntityKind
///
/// A stored entity with a typed ULID identity.
///

pub trait EntityKind: Path + Sized {
    fn id(&self) -> Id<Self>;
}
