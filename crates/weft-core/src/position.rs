//! Ordered repositioning: unordered batches of (entity, new position)
//! pairs, optionally bundled with a re-parenting, applied all-or-nothing.
//!
//! A batch may claim the same position twice; the engine applies it as
//! sent and relies on the deterministic (position, id) sort when reading
//! children back. The client generates batches from rendered UI order and
//! is trusted to send a consistent permutation.

use crate::{
    context::RequestContext,
    error::EngineError,
    grid,
    model::{Block, Col, Layout, Zone},
    obs::sink::{self, MetricsEvent, TreeLevel},
    store::Transaction,
    tree,
    types::Id,
};
use std::collections::BTreeSet;

///
/// BlockMove
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockMove {
    pub block: Id<Block>,
    /// Destination Col for cross-parent drags; `None` keeps the current one.
    pub col: Option<Id<Col>>,
    pub position: u32,
}

///
/// ColMove
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColMove {
    pub col: Id<Col>,
    /// Destination Zone for cross-parent drags; `None` keeps the current one.
    pub zone: Option<Id<Zone>>,
    pub position: u32,
}

///
/// ZoneMove
///
/// Zones never change Layout through repositioning.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ZoneMove {
    pub zone: Id<Zone>,
    pub position: u32,
}

/// Apply a Block batch: validate every referenced id, then stage all
/// position/parent changes, then refresh the dirty-timestamp paths.
pub fn reposition_blocks(
    txn: &mut Transaction<'_>,
    ctx: &RequestContext,
    batch: &[BlockMove],
) -> Result<(), EngineError> {
    // all-or-nothing: resolve everything before the first write
    for mv in batch {
        require_one_based(mv.position)?;
        txn.store().get(mv.block)?;
        if let Some(col) = mv.col {
            txn.store().get(col)?;
        }
    }

    let mut touched_layouts = BTreeSet::new();
    for mv in batch {
        let mut block = txn.store().get(mv.block)?.clone();
        if let Some(col) = mv.col {
            block.col = col;
        }
        block.position = mv.position;

        let col = txn.store().get(block.col)?;
        touched_layouts.insert(tree::owning_layout_of_col(txn.store(), col)?);
        txn.persist(block);
    }
    txn.checkpoint("reposition-blocks")?;

    for layout in touched_layouts {
        tree::touch_layout(txn, layout, ctx.now)?;
    }

    sink::record(MetricsEvent::RepositionApplied {
        level: TreeLevel::Block,
        moved: batch.len() as u64,
    });

    Ok(())
}

/// Apply a Col batch. Every Zone whose Col set was touched (origin and
/// destination) gets its grid map recomputed, and the owning Layouts get
/// their dirty-timestamp path refreshed.
pub fn reposition_cols(
    txn: &mut Transaction<'_>,
    ctx: &RequestContext,
    batch: &[ColMove],
) -> Result<(), EngineError> {
    for mv in batch {
        require_one_based(mv.position)?;
        txn.store().get(mv.col)?;
        if let Some(zone) = mv.zone {
            txn.store().get(zone)?;
        }
    }

    let mut touched_zones = BTreeSet::new();
    for mv in batch {
        let mut col = txn.store().get(mv.col)?.clone();
        touched_zones.insert(col.zone);
        if let Some(zone) = mv.zone {
            col.zone = zone;
        }
        touched_zones.insert(col.zone);
        col.position = mv.position;
        txn.persist(col);
    }
    txn.checkpoint("reposition-cols")?;

    let mut touched_layouts = BTreeSet::new();
    for zone in touched_zones {
        grid::refresh_zone(txn, zone)?;
        touched_layouts.insert(txn.store().get(zone)?.layout);
    }
    for layout in touched_layouts {
        tree::touch_layout(txn, layout, ctx.now)?;
    }

    sink::record(MetricsEvent::RepositionApplied {
        level: TreeLevel::Col,
        moved: batch.len() as u64,
    });

    Ok(())
}

/// Apply a Zone batch within their Layouts.
pub fn reposition_zones(
    txn: &mut Transaction<'_>,
    ctx: &RequestContext,
    batch: &[ZoneMove],
) -> Result<(), EngineError> {
    for mv in batch {
        require_one_based(mv.position)?;
        txn.store().get(mv.zone)?;
    }

    let mut touched_layouts = BTreeSet::new();
    for mv in batch {
        let mut zone = txn.store().get(mv.zone)?.clone();
        touched_layouts.insert(zone.layout);
        zone.position = mv.position;
        txn.persist(zone);
    }
    txn.checkpoint("reposition-zones")?;

    for layout in touched_layouts {
        tree::touch_layout(txn, layout, ctx.now)?;
    }

    sink::record(MetricsEvent::RepositionApplied {
        level: TreeLevel::Zone,
        moved: batch.len() as u64,
    });

    Ok(())
}

fn require_one_based(position: u32) -> Result<(), EngineError> {
    if position == 0 {
        return Err(EngineError::position_invariant(
            "positions are 1-based; a batch may not claim position 0",
        ));
    }

    Ok(())
}

// ------------------------------------------------------------------
// Compaction: restore the dense 1..=n sequence after structural deletes
// ------------------------------------------------------------------

/// Renumber a Layout's Zones to 1..=n preserving relative order.
pub fn compact_zones(txn: &mut Transaction<'_>, layout: Id<Layout>) -> Result<(), EngineError> {
    let ordered: Vec<Id<Zone>> = tree::zones_of(txn.store(), layout)
        .into_iter()
        .map(|zone| zone.id)
        .collect();

    for (index, id) in ordered.into_iter().enumerate() {
        renumber(txn, id, index)?;
    }

    Ok(())
}

/// Renumber a Zone's Cols to 1..=n preserving relative order.
pub fn compact_cols(txn: &mut Transaction<'_>, zone: Id<Zone>) -> Result<(), EngineError> {
    let ordered: Vec<Id<Col>> = tree::cols_of(txn.store(), zone)
        .into_iter()
        .map(|col| col.id)
        .collect();

    for (index, id) in ordered.into_iter().enumerate() {
        renumber(txn, id, index)?;
    }

    Ok(())
}

/// Renumber a Col's Blocks to 1..=n preserving relative order.
pub fn compact_blocks(txn: &mut Transaction<'_>, col: Id<Col>) -> Result<(), EngineError> {
    let ordered: Vec<Id<Block>> = tree::blocks_of(txn.store(), col)
        .into_iter()
        .map(|block| block.id)
        .collect();

    for (index, id) in ordered.into_iter().enumerate() {
        renumber(txn, id, index)?;
    }

    Ok(())
}

fn renumber<E>(txn: &mut Transaction<'_>, id: Id<E>, index: usize) -> Result<(), EngineError>
where
    E: Positioned + Clone + 'static,
    crate::store::PageStore: crate::store::EntityMap<E>,
{
    let target = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
    let current = txn.store().get(id)?;
    if current.position() == target {
        return Ok(());
    }

    let mut updated = current.clone();
    updated.set_position(target);
    txn.persist(updated);

    Ok(())
}

///
/// Positioned
///
/// Shared position accessor for the three orderable tree levels.
///

pub(crate) trait Positioned: crate::traits::EntityKind {
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

macro_rules! positioned {
    ($entity:ty) => {
        impl Positioned for $entity {
            fn position(&self) -> u32 {
                self.position
            }

            fn set_position(&mut self, position: u32) {
                self.position = position;
            }
        }
    };
}

positioned!(Zone);
positioned!(Col);
positioned!(Block);
