//! Session facade: every editor action is one method and one commit unit.
//! Methods return acknowledgement/report payloads, never raw entities.

use crate::{
    context::RequestContext,
    duplicate::Duplicator,
    error::EngineError,
    grid,
    interface::{
        Ack, AddedCol, AddedZone, DuplicateResponse, GridPreset,
        reposition::{self, RawMove},
    },
    model::{
        Attachment, Block, BlockContent, Col, Layout, Page, Website, Zone,
    },
    obs::sink::{self, MetricsSink},
    position::{self, BlockMove, ColMove, ZoneMove},
    store::{ActionTargetResolver, MediaGateway, PageStore, Transaction},
    sync, tree,
    types::{ColWidth, Id},
};
use serde::Serialize;

///
/// BootstrapIds
///
/// Identifiers of the default subtree created on first attachment.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct BootstrapIds {
    pub layout: Id<Layout>,
    pub zone: Id<Zone>,
    pub col: Id<Col>,
    pub block: Id<Block>,
}

///
/// Session
///
/// Request-scoped engine handle bundling the store with the external
/// lookup collaborators and an optional metrics sink override.
///

pub struct Session<'a> {
    store: &'a mut PageStore,
    media: &'a dyn MediaGateway,
    actions: &'a dyn ActionTargetResolver,
    metrics: Option<&'static dyn MetricsSink>,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(
        store: &'a mut PageStore,
        media: &'a dyn MediaGateway,
        actions: &'a dyn ActionTargetResolver,
    ) -> Self {
        Self {
            store,
            media,
            actions,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        match self.metrics {
            Some(sink) => sink::with_metrics_sink(sink, || f(self)),
            None => f(self),
        }
    }

    // ------------------------------------------------------------------
    // Reposition
    // ------------------------------------------------------------------

    pub fn reposition_blocks(
        &mut self,
        ctx: &RequestContext,
        batch: &[BlockMove],
    ) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "reposition-blocks");
            position::reposition_blocks(&mut txn, ctx, batch)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    pub fn reposition_cols(
        &mut self,
        ctx: &RequestContext,
        batch: &[ColMove],
    ) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "reposition-cols");
            position::reposition_cols(&mut txn, ctx, batch)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    pub fn reposition_zones(
        &mut self,
        ctx: &RequestContext,
        batch: &[ZoneMove],
    ) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "reposition-zones");
            position::reposition_zones(&mut txn, ctx, batch)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    /// Serialized form of [`Self::reposition_blocks`] ("a=2&b=1", value
    /// optionally "colId,position").
    pub fn reposition_blocks_wire(
        &mut self,
        ctx: &RequestContext,
        raw: &str,
    ) -> Result<Ack, EngineError> {
        let batch: Vec<RawMove> = reposition::parse_batch(raw)?;

        self.reposition_blocks(ctx, &reposition::block_moves(&batch))
    }

    /// Serialized form of [`Self::reposition_cols`].
    pub fn reposition_cols_wire(
        &mut self,
        ctx: &RequestContext,
        raw: &str,
    ) -> Result<Ack, EngineError> {
        let batch = reposition::parse_batch(raw)?;

        self.reposition_cols(ctx, &reposition::col_moves(&batch))
    }

    /// Serialized form of [`Self::reposition_zones`].
    pub fn reposition_zones_wire(
        &mut self,
        ctx: &RequestContext,
        raw: &str,
    ) -> Result<Ack, EngineError> {
        let batch = reposition::parse_batch(raw)?;
        let moves = reposition::zone_moves(&batch)?;

        self.reposition_zones(ctx, &moves)
    }

    // ------------------------------------------------------------------
    // Add / bootstrap
    // ------------------------------------------------------------------

    /// First attachment of a Layout to a business entity: one default
    /// full-width Zone/Col/Text-Block, locale records synchronized.
    pub fn bootstrap_layout(
        &mut self,
        ctx: &RequestContext,
        name: &str,
        attachment: Option<Attachment>,
    ) -> Result<BootstrapIds, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "bootstrap-layout");
            txn.store().get(ctx.website)?;

            let mut layout = Layout::new(ctx.website, name);
            layout.updated_at = ctx.now;
            layout.attachment = attachment;
            let layout_id = layout.id;
            txn.persist(layout);

            let mut zone = Zone::new(layout_id);
            zone.full_width = true;
            let zone_id = tree::attach_zone(&mut txn, zone)?;
            let col_id = tree::attach_col(&mut txn, Col::new(zone_id, ColWidth::FULL))?;
            let block_id = tree::attach_block(&mut txn, Block::new(col_id, BlockContent::Text))?;

            sync::sync_zone(&mut txn, zone_id)?;
            sync::sync_block(&mut txn, block_id)?;
            grid::refresh_zone(&mut txn, zone_id)?;
            txn.commit();

            Ok(BootstrapIds {
                layout: layout_id,
                zone: zone_id,
                col: col_id,
                block: block_id,
            })
        })
    }

    /// Add a Zone; a grid preset expands into its Cols (one Text Block
    /// each), no preset means one full-width Col/Block.
    pub fn add_zone(
        &mut self,
        ctx: &RequestContext,
        layout: Id<Layout>,
        preset: Option<&GridPreset>,
    ) -> Result<AddedZone, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "add-zone");
            let zone = tree::attach_zone(&mut txn, Zone::new(layout))?;
            sync::sync_zone(&mut txn, zone)?;

            let widths: Vec<ColWidth> =
                preset.map_or_else(|| vec![ColWidth::FULL], |preset| preset.widths().to_vec());
            let mut cols = Vec::with_capacity(widths.len());
            for width in widths {
                let col = tree::attach_col(&mut txn, Col::new(zone, width))?;
                let block = tree::attach_block(&mut txn, Block::new(col, BlockContent::Text))?;
                sync::sync_block(&mut txn, block)?;
                cols.push(AddedCol { col, block });
            }

            grid::refresh_zone(&mut txn, zone)?;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(AddedZone { zone, cols })
        })
    }

    /// Add a Col (with a default Text Block) to a Zone.
    pub fn add_col(
        &mut self,
        ctx: &RequestContext,
        zone: Id<Zone>,
        width: ColWidth,
    ) -> Result<AddedCol, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "add-col");
            let col = tree::attach_col(&mut txn, Col::new(zone, width))?;
            let block = tree::attach_block(&mut txn, Block::new(col, BlockContent::Text))?;
            sync::sync_block(&mut txn, block)?;

            grid::refresh_zone(&mut txn, zone)?;
            let layout = txn.store().get(zone)?.layout;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(AddedCol { col, block })
        })
    }

    /// Add a Block of the given content kind to a Col.
    pub fn add_block(
        &mut self,
        ctx: &RequestContext,
        col: Id<Col>,
        content: BlockContent,
    ) -> Result<Id<Block>, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "add-block");
            let block = tree::attach_block(&mut txn, Block::new(col, content))?;
            sync::sync_block(&mut txn, block)?;

            let col_entity = txn.store().get(col)?;
            let layout = tree::owning_layout_of_col(txn.store(), col_entity)?;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(block)
        })
    }

    // ------------------------------------------------------------------
    // Delete (cascading, with explicit compaction)
    // ------------------------------------------------------------------

    pub fn delete_block(
        &mut self,
        ctx: &RequestContext,
        block: Id<Block>,
    ) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "delete-block");
            let removed = txn.remove::<Block>(block)?;
            position::compact_blocks(&mut txn, removed.col)?;

            let col = txn.store().get(removed.col)?;
            let layout = tree::owning_layout_of_col(txn.store(), col)?;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    pub fn delete_col(&mut self, ctx: &RequestContext, col: Id<Col>) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "delete-col");
            let zone = remove_col_cascade(&mut txn, col)?;

            let layout = txn.store().get(zone)?.layout;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    pub fn delete_zone(&mut self, ctx: &RequestContext, zone: Id<Zone>) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "delete-zone");
            let cols: Vec<Id<Col>> = tree::cols_of(txn.store(), zone)
                .into_iter()
                .map(|col| col.id)
                .collect();
            for col in cols {
                let blocks: Vec<Id<Block>> = tree::blocks_of(txn.store(), col)
                    .into_iter()
                    .map(|block| block.id)
                    .collect();
                for block in blocks {
                    txn.remove::<Block>(block)?;
                }
                txn.remove::<Col>(col)?;
            }

            let removed = txn.remove::<Zone>(zone)?;
            position::compact_zones(&mut txn, removed.layout)?;
            tree::touch_layout(&mut txn, removed.layout, ctx.now)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    /// Remove a Layout and everything under it (owning business entity
    /// went away).
    pub fn delete_layout(&mut self, layout: Id<Layout>) -> Result<Ack, EngineError> {
        self.scoped(|session| {
            let mut txn = Transaction::new(session.store, "delete-layout");
            let zones: Vec<Id<Zone>> = tree::zones_of(txn.store(), layout)
                .into_iter()
                .map(|zone| zone.id)
                .collect();
            for zone in zones {
                let cols: Vec<Id<Col>> = tree::cols_of(txn.store(), zone)
                    .into_iter()
                    .map(|col| col.id)
                    .collect();
                for col in cols {
                    let blocks: Vec<Id<Block>> = tree::blocks_of(txn.store(), col)
                        .into_iter()
                        .map(|block| block.id)
                        .collect();
                    for block in blocks {
                        txn.remove::<Block>(block)?;
                    }
                    txn.remove::<Col>(col)?;
                }
                txn.remove::<Zone>(zone)?;
            }
            txn.remove::<Layout>(layout)?;
            txn.commit();

            Ok(Ack::ok())
        })
    }

    // ------------------------------------------------------------------
    // Duplicate
    // ------------------------------------------------------------------

    pub fn duplicate_block(
        &mut self,
        ctx: &RequestContext,
        source: Id<Block>,
        dest_col: Id<Col>,
    ) -> Result<DuplicateResponse, EngineError> {
        self.scoped(|session| {
            let duplicator = Duplicator::new(session.media, session.actions);
            let mut txn = Transaction::new(session.store, "duplicate-block");

            let duplicated = duplicator.duplicate_block(&mut txn, ctx, source, dest_col)?;
            let col = txn.store().get(dest_col)?;
            let layout = tree::owning_layout_of_col(txn.store(), col)?;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(DuplicateResponse::from_duplicated(duplicated))
        })
    }

    pub fn duplicate_col(
        &mut self,
        ctx: &RequestContext,
        source: Id<Col>,
        dest_zone: Id<Zone>,
    ) -> Result<DuplicateResponse, EngineError> {
        self.scoped(|session| {
            let duplicator = Duplicator::new(session.media, session.actions);
            let mut txn = Transaction::new(session.store, "duplicate-col");

            let duplicated = duplicator.duplicate_col(&mut txn, ctx, source, dest_zone)?;
            grid::refresh_zone(&mut txn, dest_zone)?;
            let layout = txn.store().get(dest_zone)?.layout;
            tree::touch_layout(&mut txn, layout, ctx.now)?;
            txn.commit();

            Ok(DuplicateResponse::from_duplicated(duplicated))
        })
    }

    pub fn duplicate_zone(
        &mut self,
        ctx: &RequestContext,
        source: Id<Zone>,
        dest_layout: Id<Layout>,
    ) -> Result<DuplicateResponse, EngineError> {
        self.scoped(|session| {
            let duplicator = Duplicator::new(session.media, session.actions);
            let mut txn = Transaction::new(session.store, "duplicate-zone");

            let duplicated = duplicator.duplicate_zone(&mut txn, ctx, source, dest_layout)?;
            txn.commit();

            Ok(DuplicateResponse::from_duplicated(duplicated))
        })
    }

    pub fn duplicate_layout(
        &mut self,
        ctx: &RequestContext,
        shell: Layout,
        source: Id<Layout>,
        dest_website: Id<Website>,
    ) -> Result<DuplicateResponse, EngineError> {
        self.scoped(|session| {
            let duplicator = Duplicator::new(session.media, session.actions);
            let mut txn = Transaction::new(session.store, "duplicate-layout");

            let duplicated =
                duplicator.duplicate_layout(&mut txn, ctx, shell, source, dest_website)?;
            txn.commit();

            Ok(DuplicateResponse::from_duplicated(duplicated))
        })
    }

    pub fn duplicate_page(
        &mut self,
        ctx: &RequestContext,
        source: Id<Page>,
        dest_website: Id<Website>,
        dest_parent: Option<Id<Page>>,
    ) -> Result<DuplicateResponse, EngineError> {
        self.scoped(|session| {
            let duplicator = Duplicator::new(session.media, session.actions);
            let mut txn = Transaction::new(session.store, "duplicate-page");

            let duplicated =
                duplicator.duplicate_page(&mut txn, ctx, source, dest_website, dest_parent)?;
            txn.commit();

            Ok(DuplicateResponse::from_duplicated(duplicated))
        })
    }
}

// Cascade blocks, remove the col, compact and refresh the surviving
// zone. Returns the zone for the dirty-timestamp path.
fn remove_col_cascade(txn: &mut Transaction<'_>, col: Id<Col>) -> Result<Id<Zone>, EngineError> {
    let blocks: Vec<Id<Block>> = tree::blocks_of(txn.store(), col)
        .into_iter()
        .map(|block| block.id)
        .collect();
    for block in blocks {
        txn.remove::<Block>(block)?;
    }

    let removed = txn.remove::<Col>(col)?;
    position::compact_cols(txn, removed.zone)?;
    grid::refresh_zone(txn, removed.zone)?;

    Ok(removed.zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::BlockKind, obs::sink::MetricsEvent, test_support, types::Timestamp};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session(fx: &mut test_support::Fixture) -> Session<'_> {
        Session::new(&mut fx.store, &fx.media, &fx.actions)
    }

    #[test]
    fn bootstrap_creates_default_subtree() {
        let mut fx = test_support::two_block_fixture_with_locales(&["fr", "en"], "fr");
        let ctx = fx.ctx(Timestamp::from_seconds(7));

        let ids = session(&mut fx)
            .bootstrap_layout(&ctx, "Landing", None)
            .unwrap();

        let layout = fx.store.get(ids.layout).unwrap();
        assert_eq!(layout.updated_at, Timestamp::from_seconds(7));

        let zone = fx.store.get(ids.zone).unwrap();
        assert!(zone.full_width);
        assert_eq!(zone.position, 1);
        assert_eq!(zone.intls.len(), 2);
        assert_eq!(zone.grid_map.get(&ids.col).map(String::as_str), Some("12"));

        let col = fx.store.get(ids.col).unwrap();
        assert_eq!(col.width, ColWidth::FULL);
        assert_eq!(col.position, 1);

        let block = fx.store.get(ids.block).unwrap();
        assert_eq!(block.kind(), BlockKind::Text);
        assert_eq!(block.position, 1);
        assert_eq!(block.intls.len(), 2);
    }

    #[test]
    fn add_zone_expands_grid_preset() {
        let mut fx = test_support::two_block_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(3));
        let preset = GridPreset::parse("6-4-2").unwrap();

        let layout = fx.layout;
        let added = session(&mut fx)
            .add_zone(&ctx, layout, Some(&preset))
            .unwrap();

        assert_eq!(added.cols.len(), 3);
        let widths: Vec<u8> = tree::cols_of(&fx.store, added.zone)
            .iter()
            .map(|col| col.width.get())
            .collect();
        assert_eq!(widths, vec![6, 4, 2]);

        // 6 + 4 + 2 fits one row
        let zone = fx.store.get(added.zone).unwrap();
        for entry in &added.cols {
            assert_eq!(zone.grid_map.get(&entry.col).map(String::as_str), Some("6-4-2"));
        }
    }

    #[test]
    fn add_zone_defaults_to_full_width() {
        let mut fx = test_support::two_block_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(3));

        let layout = fx.layout;
        let added = session(&mut fx).add_zone(&ctx, layout, None).unwrap();

        assert_eq!(added.cols.len(), 1);
        let col = fx.store.get(added.cols[0].col).unwrap();
        assert_eq!(col.width, ColWidth::FULL);
        assert!(fx.store.contains(added.cols[0].block));
    }

    #[test]
    fn wire_reposition_swaps_blocks() {
        let mut fx = test_support::two_block_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(9));
        let (block_a, block_b) = (fx.blocks[0], fx.blocks[1]);
        let raw = format!("{block_a}=2&{block_b}=1");

        let ack = session(&mut fx)
            .reposition_blocks_wire(&ctx, &raw)
            .unwrap();

        assert!(ack.success);
        assert_eq!(fx.store.get(block_b).unwrap().position, 1);
        assert_eq!(fx.store.get(block_a).unwrap().position, 2);
        assert_eq!(
            fx.store.get(fx.layout).unwrap().updated_at,
            Timestamp::from_seconds(9)
        );
    }

    #[test]
    fn malformed_wire_batch_changes_nothing() {
        let mut fx = test_support::two_block_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(9));
        let before = fx.store.clone();

        let err = session(&mut fx)
            .reposition_blocks_wire(&ctx, "junk")
            .unwrap_err();

        assert_eq!(err.origin, crate::error::ErrorOrigin::Interface);
        assert_eq!(fx.store, before);
    }

    #[test]
    fn delete_col_compacts_and_refreshes_grid() {
        let mut fx = test_support::three_col_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(4));
        let middle = fx.cols[1];
        let zone = fx.zones[0];

        session(&mut fx).delete_col(&ctx, middle).unwrap();

        let cols = tree::cols_of(&fx.store, zone);
        let positions: Vec<u32> = cols.iter().map(|col| col.position).collect();
        assert_eq!(positions, vec![1, 2]);

        let map = &fx.store.get(zone).unwrap().grid_map;
        assert_eq!(map.len(), 2);
        for col in cols {
            assert_eq!(map.get(&col.id).map(String::as_str), Some("4-4"));
        }
    }

    #[test]
    fn delete_zone_cascades_and_renumbers() {
        let mut fx = test_support::two_zone_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(4));
        let (zone_a, zone_b) = (fx.zones[0], fx.zones[1]);
        let col_a = fx.cols[0];

        session(&mut fx).delete_zone(&ctx, zone_a).unwrap();

        assert!(!fx.store.contains(zone_a));
        assert!(!fx.store.contains(col_a));
        assert_eq!(fx.store.get(zone_b).unwrap().position, 1);
    }

    struct EventCount {
        events: AtomicUsize,
    }

    impl MetricsSink for EventCount {
        fn record(&self, _: MetricsEvent) {
            self.events.fetch_add(1, Ordering::SeqCst);
        }
    }

    static COUNTING: EventCount = EventCount {
        events: AtomicUsize::new(0),
    };

    #[test]
    fn metrics_sink_override_sees_session_events() {
        let mut fx = test_support::two_block_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(2));
        let block = fx.blocks[0];
        let baseline = COUNTING.events.load(Ordering::SeqCst);

        session(&mut fx)
            .metrics_sink(&COUNTING)
            .reposition_blocks(
                &ctx,
                &[BlockMove {
                    block,
                    col: None,
                    position: 1,
                }],
            )
            .unwrap();

        assert!(COUNTING.events.load(Ordering::SeqCst) > baseline);
    }

    #[test]
    fn duplicate_zone_response_shape() {
        let mut fx = test_support::two_block_fixture();
        let ctx = fx.ctx(Timestamp::from_seconds(2));
        let source = fx.zones[0];
        let layout = fx.layout;

        let response = session(&mut fx).duplicate_zone(&ctx, source, layout).unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("root").is_some());
        assert!(json.get("remaps").is_some());
        assert_ne!(response.root, source.ulid());
    }
}
