use crate::{
    error::EngineError,
    store::{EntityMap, PageStore},
    traits::EntityKind,
    types::Id,
};

///
/// Transaction
///
/// One editor action's commit unit. Writes apply eagerly against the store
/// and record an inverse in the undo journal; dropping an uncommitted
/// transaction replays the journal in reverse, so a failed multi-entity
/// mutation leaves no partial state behind.
///

pub struct Transaction<'s> {
    store: &'s mut PageStore,
    label: &'static str,
    rollbacks: Vec<Box<dyn FnOnce(&mut PageStore)>>,
    committed: bool,
}

impl<'s> Transaction<'s> {
    pub(crate) fn new(store: &'s mut PageStore, label: &'static str) -> Self {
        Self {
            store,
            label,
            rollbacks: Vec::new(),
            committed: false,
        }
    }

    /// Reads see staged writes: the journal only matters on rollback.
    #[must_use]
    pub fn store(&self) -> &PageStore {
        self.store
    }

    /// Stage an insert-or-replace of one entity.
    pub fn persist<E>(&mut self, entity: E)
    where
        E: EntityKind + 'static,
        PageStore: EntityMap<E>,
    {
        let id = entity.id();
        let previous = self.store.insert(entity);

        self.rollbacks.push(Box::new(move |store| {
            match previous {
                Some(prev) => store.insert(prev),
                None => store.take(id),
            };
        }));
    }

    /// Stage a removal, returning the removed entity.
    pub fn remove<E>(&mut self, id: Id<E>) -> Result<E, EngineError>
    where
        E: EntityKind + Clone + 'static,
        PageStore: EntityMap<E>,
    {
        let removed = self
            .store
            .take(id)
            .ok_or_else(|| EngineError::store_not_found(E::PATH, id))?;

        let restore = removed.clone();
        self.rollbacks.push(Box::new(move |store| {
            store.insert(restore);
        }));

        Ok(removed)
    }

    /// Persistence failure injection point for tests; a forced failure
    /// rolls the whole transaction back before surfacing.
    pub fn checkpoint(&mut self, label: &'static str) -> Result<(), EngineError> {
        if should_fail_checkpoint(label) {
            self.rollback();
            return Err(EngineError::store_internal(format!(
                "forced failure: {} ({label})",
                self.label
            )));
        }
        Ok(())
    }

    pub fn commit(mut self) {
        // Internal invariant: a transaction can only be committed once.
        assert!(
            !self.committed,
            "transaction invariant violated: commit called twice"
        );
        self.committed = true;
        self.rollbacks.clear();
    }

    fn rollback(&mut self) {
        // Internal invariant: rollbacks must not run after commit.
        assert!(
            !self.committed,
            "transaction invariant violated: rollback after commit"
        );
        while let Some(rollback) = self.rollbacks.pop() {
            rollback(self.store);
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

#[cfg(test)]
thread_local! {
    static FAIL_CHECKPOINT: std::cell::Cell<Option<&'static str>> =
        const { std::cell::Cell::new(None) };
}

/// Arm the next checkpoint carrying `label` to fail.
#[cfg(test)]
pub(crate) fn fail_at_checkpoint(label: &'static str) {
    FAIL_CHECKPOINT.with(|slot| slot.set(Some(label)));
}

#[allow(clippy::missing_const_for_fn)]
#[allow(unused_variables)]
fn should_fail_checkpoint(label: &'static str) -> bool {
    #[cfg(test)]
    {
        FAIL_CHECKPOINT.with(|slot| {
            let fail = slot.get() == Some(label);
            if fail {
                slot.set(None);
            }
            fail
        })
    }

    #[cfg(not(test))]
    {
        false
    }
}
