use crate::{
    error::EngineError,
    model::{ActionTarget, MediaAsset, Website},
    types::{Id, Locale, Slug},
};

///
/// MediaFile
///
/// Resolved media metadata. File bytes stay with the upload/storage
/// collaborator; the engine only carries the reference.
///

#[derive(Clone, Debug, PartialEq)]
pub struct MediaFile {
    pub id: Id<MediaAsset>,
    pub file_name: String,
}

///
/// MediaGateway
///
/// External media store boundary. A `None` means the asset is gone;
/// duplication omits the reference instead of aborting.
///

pub trait MediaGateway {
    fn resolve_media(&self, id: Id<MediaAsset>) -> Option<MediaFile>;
}

///
/// ActionTargetResolver
///
/// Business-entity lookup by natural key, used only by cross-website
/// action re-targeting.
///

pub trait ActionTargetResolver {
    fn slug_of(&self, target: Id<ActionTarget>) -> Option<Slug>;

    fn find_by_slug(&self, website: Id<Website>, slug: &Slug) -> Option<Id<ActionTarget>>;
}

///
/// LocaleRegistry
///
/// Locale configuration boundary for an owning website.
///

pub trait LocaleRegistry {
    fn locales_for(&self, website: Id<Website>) -> Result<Vec<Locale>, EngineError>;

    fn default_locale(&self, website: Id<Website>) -> Result<Locale, EngineError>;
}
