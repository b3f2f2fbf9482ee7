//! Ownership tree contract: ordered children, position-assigning attach,
//! and the dirty-timestamp path up to the Layout and its attachment.
//!
//! Detaching is plain [`Transaction::remove`]; compaction of the surviving
//! sibling group is the position manager's job and is invoked explicitly
//! by the delete operations that must keep sequences dense.

use crate::{
    error::EngineError,
    model::{AttachmentKind, Block, Col, Layout, Page, Website, Zone},
    store::{PageStore, Transaction},
    types::{Id, Timestamp},
};

/// Zones of a Layout, ordered by position (id breaks ties).
#[must_use]
pub fn zones_of(store: &PageStore, layout: Id<Layout>) -> Vec<&Zone> {
    let mut zones: Vec<&Zone> = store
        .iter::<Zone>()
        .filter(|zone| zone.layout == layout)
        .collect();
    zones.sort_by_key(|zone| (zone.position, zone.id));

    zones
}

/// Cols of a Zone, ordered by position (id breaks ties).
#[must_use]
pub fn cols_of(store: &PageStore, zone: Id<Zone>) -> Vec<&Col> {
    let mut cols: Vec<&Col> = store.iter::<Col>().filter(|col| col.zone == zone).collect();
    cols.sort_by_key(|col| (col.position, col.id));

    cols
}

/// Blocks of a Col, ordered by position (id breaks ties).
#[must_use]
pub fn blocks_of(store: &PageStore, col: Id<Col>) -> Vec<&Block> {
    let mut blocks: Vec<&Block> = store
        .iter::<Block>()
        .filter(|block| block.col == col)
        .collect();
    blocks.sort_by_key(|block| (block.position, block.id));

    blocks
}

/// Child pages of a parent (or roots) within a website, ordered by position.
#[must_use]
pub fn pages_under(store: &PageStore, website: Id<Website>, parent: Option<Id<Page>>) -> Vec<&Page> {
    let mut pages: Vec<&Page> = store
        .iter::<Page>()
        .filter(|page| page.website == website && page.parent == parent)
        .collect();
    pages.sort_by_key(|page| (page.position, page.id));

    pages
}

/// Attach a Zone to its Layout at the next free position.
pub fn attach_zone(txn: &mut Transaction<'_>, mut zone: Zone) -> Result<Id<Zone>, EngineError> {
    txn.store().get(zone.layout)?;
    zone.position = next_position(zones_of(txn.store(), zone.layout).len());

    let id = zone.id;
    txn.persist(zone);

    Ok(id)
}

/// Attach a Col to its Zone at the next free position.
pub fn attach_col(txn: &mut Transaction<'_>, mut col: Col) -> Result<Id<Col>, EngineError> {
    txn.store().get(col.zone)?;
    col.position = next_position(cols_of(txn.store(), col.zone).len());

    let id = col.id;
    txn.persist(col);

    Ok(id)
}

/// Attach a Block to its Col at the next free position.
pub fn attach_block(txn: &mut Transaction<'_>, mut block: Block) -> Result<Id<Block>, EngineError> {
    txn.store().get(block.col)?;
    block.position = next_position(blocks_of(txn.store(), block.col).len());

    let id = block.id;
    txn.persist(block);

    Ok(id)
}

fn next_position(sibling_count: usize) -> u32 {
    u32::try_from(sibling_count).unwrap_or(u32::MAX).saturating_add(1)
}

/// Refresh the dirty-timestamp path: the Layout and, when the attachment
/// is a Page present in the store, the Page as well.
pub fn touch_layout(
    txn: &mut Transaction<'_>,
    layout: Id<Layout>,
    now: Timestamp,
) -> Result<(), EngineError> {
    let mut touched = txn.store().get(layout)?.clone();
    touched.updated_at = now;
    let attachment = touched.attachment;
    txn.persist(touched);

    if let Some(attachment) = attachment {
        if attachment.kind == AttachmentKind::Page {
            let page_id = Id::<Page>::from_ulid(attachment.target);
            if let Some(page) = txn.store().find(page_id) {
                let mut page = page.clone();
                page.updated_at = now;
                txn.persist(page);
            }
        }
    }

    Ok(())
}

// ------------------------------------------------------------------
// Owning chain resolution (back-pointers are ids, not references)
// ------------------------------------------------------------------

pub fn owning_website_of_zone(store: &PageStore, zone: &Zone) -> Result<Id<Website>, EngineError> {
    Ok(store.get(zone.layout)?.website)
}

pub fn owning_website_of_col(store: &PageStore, col: &Col) -> Result<Id<Website>, EngineError> {
    let zone = store.get(col.zone)?;

    owning_website_of_zone(store, zone)
}

pub fn owning_website_of_block(
    store: &PageStore,
    block: &Block,
) -> Result<Id<Website>, EngineError> {
    let col = store.get(block.col)?;

    owning_website_of_col(store, col)
}

/// Layout a Col ultimately belongs to.
pub fn owning_layout_of_col(store: &PageStore, col: &Col) -> Result<Id<Layout>, EngineError> {
    Ok(store.get(col.zone)?.layout)
}
