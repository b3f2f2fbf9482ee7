use crate::{
    error::EngineError,
    model::{Block, Col, Layout, Page, Website, Zone},
    traits::EntityKind,
    types::{Id, Locale},
};
use std::collections::BTreeMap;

pub mod gateway;
pub mod txn;

pub use gateway::{ActionTargetResolver, LocaleRegistry, MediaFile, MediaGateway};
pub use txn::Transaction;

///
/// EntityMap
///
/// Typed access to one entity family's map inside the store.
///

pub trait EntityMap<E: EntityKind> {
    fn map(&self) -> &BTreeMap<Id<E>, E>;
    fn map_mut(&mut self) -> &mut BTreeMap<Id<E>, E>;
}

///
/// PageStore
///
/// Engine-facing face of the persistence collaborator: typed in-memory
/// maps with find/persist/remove semantics. Mutation goes through
/// [`Transaction`] so every editor action stays all-or-nothing.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageStore {
    websites: BTreeMap<Id<Website>, Website>,
    layouts: BTreeMap<Id<Layout>, Layout>,
    zones: BTreeMap<Id<Zone>, Zone>,
    cols: BTreeMap<Id<Col>, Col>,
    blocks: BTreeMap<Id<Block>, Block>,
    pages: BTreeMap<Id<Page>, Page>,
}

macro_rules! entity_map {
    ($entity:ty, $field:ident) => {
        impl EntityMap<$entity> for PageStore {
            fn map(&self) -> &BTreeMap<Id<$entity>, $entity> {
                &self.$field
            }

            fn map_mut(&mut self) -> &mut BTreeMap<Id<$entity>, $entity> {
                &mut self.$field
            }
        }
    };
}

entity_map!(Website, websites);
entity_map!(Layout, layouts);
entity_map!(Zone, zones);
entity_map!(Col, cols);
entity_map!(Block, blocks);
entity_map!(Page, pages);

impl PageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn find<E: EntityKind>(&self, id: Id<E>) -> Option<&E>
    where
        Self: EntityMap<E>,
    {
        self.map().get(&id)
    }

    pub fn get<E: EntityKind>(&self, id: Id<E>) -> Result<&E, EngineError>
    where
        Self: EntityMap<E>,
    {
        self.find(id)
            .ok_or_else(|| EngineError::store_not_found(E::PATH, id))
    }

    #[must_use]
    pub fn contains<E: EntityKind>(&self, id: Id<E>) -> bool
    where
        Self: EntityMap<E>,
    {
        self.map().contains_key(&id)
    }

    pub fn iter<'a, E: EntityKind + 'a>(&'a self) -> impl Iterator<Item = &'a E>
    where
        Self: EntityMap<E>,
    {
        self.map().values()
    }

    #[must_use]
    pub fn len<E: EntityKind>(&self) -> usize
    where
        Self: EntityMap<E>,
    {
        self.map().len()
    }

    pub(crate) fn insert<E: EntityKind>(&mut self, entity: E) -> Option<E>
    where
        Self: EntityMap<E>,
    {
        let id = entity.id();
        self.map_mut().insert(id, entity)
    }

    pub(crate) fn take<E: EntityKind>(&mut self, id: Id<E>) -> Option<E>
    where
        Self: EntityMap<E>,
    {
        self.map_mut().remove(&id)
    }
}

impl LocaleRegistry for PageStore {
    fn locales_for(&self, website: Id<Website>) -> Result<Vec<Locale>, EngineError> {
        self.get(website).map(|site| site.locales.clone())
    }

    fn default_locale(&self, website: Id<Website>) -> Result<Locale, EngineError> {
        self.get(website).map(|site| site.default_locale.clone())
    }
}
