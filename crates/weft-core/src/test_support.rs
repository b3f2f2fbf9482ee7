//! Shared fixtures for unit tests: seeded websites, small layout trees,
//! and in-memory stand-ins for the external collaborators.

use crate::{
    context::RequestContext,
    model::{
        ActionTarget, Block, BlockContent, Col, Layout, MediaAsset, Page, Website, Zone,
    },
    store::{ActionTargetResolver, MediaFile, MediaGateway, PageStore, Transaction},
    tree,
    types::{ColWidth, Id, Locale, Slug, Timestamp},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Fixture
///

pub(crate) struct Fixture {
    pub store: PageStore,
    pub site: Id<Website>,
    pub layout: Id<Layout>,
    pub zones: Vec<Id<Zone>>,
    pub cols: Vec<Id<Col>>,
    pub blocks: Vec<Id<Block>>,
    pub media: FixtureMedia,
    pub actions: FixtureActions,
}

impl Fixture {
    pub fn ctx(&self, now: Timestamp) -> RequestContext {
        RequestContext::for_website(self.store.get(self.site).unwrap(), now)
    }
}

pub(crate) fn locales(codes: &[&str]) -> Vec<Locale> {
    codes.iter().map(|code| Locale::new(code).unwrap()).collect()
}

pub(crate) fn slug(raw: &str) -> Slug {
    Slug::new(raw).unwrap()
}

/// Store with one website, nothing else.
pub(crate) fn seeded_site(codes: &[&str], default: &str) -> (PageStore, Id<Website>) {
    let mut store = PageStore::new();
    let website = Website::new("demo", locales(codes), Locale::new(default).unwrap());
    let id = website.id;

    let mut txn = Transaction::new(&mut store, "fixture");
    txn.persist(website);
    txn.commit();

    (store, id)
}

/// Empty Layout under a website.
pub(crate) fn empty_layout(store: &mut PageStore, site: Id<Website>) -> Id<Layout> {
    let layout = Layout::new(site, "fixture layout");
    let id = layout.id;

    let mut txn = Transaction::new(store, "fixture");
    txn.persist(layout);
    txn.commit();

    id
}

/// Attach one Col per width to a Zone.
pub(crate) fn attach_cols(txn: &mut Transaction<'_>, zone: Id<Zone>, widths: &[u8]) -> Vec<Id<Col>> {
    widths
        .iter()
        .map(|&width| {
            tree::attach_col(txn, Col::new(zone, ColWidth::try_from(width).unwrap())).unwrap()
        })
        .collect()
}

fn base(codes: &[&str], default: &str, media_secondary: bool) -> Fixture {
    let mut store = PageStore::new();
    let mut website = Website::new("demo", locales(codes), Locale::new(default).unwrap());
    if media_secondary {
        website = website.media_secondary();
    }
    let site = website.id;

    let mut txn = Transaction::new(&mut store, "fixture");
    txn.persist(website);
    txn.commit();

    let layout = empty_layout(&mut store, site);

    Fixture {
        store,
        site,
        layout,
        zones: Vec::new(),
        cols: Vec::new(),
        blocks: Vec::new(),
        media: FixtureMedia::default(),
        actions: FixtureActions::default(),
    }
}

/// One zone, one full-width col, `n` text blocks.
pub(crate) fn n_block_fixture(n: usize) -> Fixture {
    let mut fx = base(&["fr"], "fr", false);

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    let zone = tree::attach_zone(&mut txn, Zone::new(fx.layout)).unwrap();
    let col = tree::attach_col(&mut txn, Col::new(zone, ColWidth::FULL)).unwrap();
    let blocks: Vec<Id<Block>> = (0..n)
        .map(|_| tree::attach_block(&mut txn, Block::new(col, BlockContent::Text)).unwrap())
        .collect();
    txn.commit();

    fx.zones.push(zone);
    fx.cols.push(col);
    fx.blocks = blocks;

    fx
}

pub(crate) fn two_block_fixture() -> Fixture {
    n_block_fixture(2)
}

/// Like [`two_block_fixture`] but with a custom locale configuration.
pub(crate) fn two_block_fixture_with_locales(codes: &[&str], default: &str) -> Fixture {
    let mut fx = base(codes, default, false);

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    let zone = tree::attach_zone(&mut txn, Zone::new(fx.layout)).unwrap();
    let col = tree::attach_col(&mut txn, Col::new(zone, ColWidth::FULL)).unwrap();
    let blocks: Vec<Id<Block>> = (0..2)
        .map(|_| tree::attach_block(&mut txn, Block::new(col, BlockContent::Text)).unwrap())
        .collect();
    txn.commit();

    fx.zones.push(zone);
    fx.cols.push(col);
    fx.blocks = blocks;

    fx
}

/// Two zones with one width-6 col each, grid maps computed.
pub(crate) fn two_zone_fixture() -> Fixture {
    let mut fx = base(&["fr"], "fr", false);

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    let zone_a = tree::attach_zone(&mut txn, Zone::new(fx.layout)).unwrap();
    let zone_b = tree::attach_zone(&mut txn, Zone::new(fx.layout)).unwrap();
    let cols = vec![
        attach_cols(&mut txn, zone_a, &[6])[0],
        attach_cols(&mut txn, zone_b, &[6])[0],
    ];
    crate::grid::refresh_zone(&mut txn, zone_a).unwrap();
    crate::grid::refresh_zone(&mut txn, zone_b).unwrap();
    txn.commit();

    fx.zones = vec![zone_a, zone_b];
    fx.cols = cols;

    fx
}

/// One zone with three width-4 cols.
pub(crate) fn three_col_fixture() -> Fixture {
    let mut fx = base(&["fr"], "fr", false);

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    let zone = tree::attach_zone(&mut txn, Zone::new(fx.layout)).unwrap();
    let cols = attach_cols(&mut txn, zone, &[4, 4, 4]);
    txn.commit();

    fx.zones.push(zone);
    fx.cols = cols;

    fx
}

/// One media block with no relations yet.
pub(crate) fn media_block_fixture(codes: &[&str], default: &str, media_secondary: bool) -> Fixture {
    let mut fx = base(codes, default, media_secondary);

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    let zone = tree::attach_zone(&mut txn, Zone::new(fx.layout)).unwrap();
    let col = tree::attach_col(&mut txn, Col::new(zone, ColWidth::FULL)).unwrap();
    let block = tree::attach_block(
        &mut txn,
        Block::new(
            col,
            BlockContent::Media {
                relations: Vec::new(),
            },
        ),
    )
    .unwrap();
    txn.commit();

    fx.zones.push(zone);
    fx.cols.push(col);
    fx.blocks.push(block);

    fx
}

/// Second website added to a fixture's store, with its own empty layout.
pub(crate) fn add_site(
    fx: &mut Fixture,
    codes: &[&str],
    default: &str,
) -> (Id<Website>, Id<Layout>) {
    let website = Website::new("other", locales(codes), Locale::new(default).unwrap());
    let site = website.id;

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    txn.persist(website);
    txn.commit();

    let layout = empty_layout(&mut fx.store, site);

    (site, layout)
}

/// Seed a page wrapping an existing layout.
pub(crate) fn add_page(fx: &mut Fixture, site: Id<Website>, layout: Id<Layout>, raw_slug: &str) -> Id<Page> {
    let locales = fx.store.get(site).unwrap().locales.clone();
    let page = Page {
        id: Id::generate(),
        website: site,
        parent: None,
        level: 1,
        position: 1,
        name: raw_slug.to_string(),
        slug: slug(raw_slug),
        aliases: locales
            .into_iter()
            .map(|locale| crate::model::PageAlias {
                locale,
                alias: slug(raw_slug),
            })
            .collect(),
        layout,
        updated_at: Timestamp::EPOCH,
    };
    let id = page.id;

    let mut txn = Transaction::new(&mut fx.store, "fixture");
    txn.persist(page);
    txn.commit();

    id
}

///
/// FixtureMedia
///

#[derive(Default)]
pub(crate) struct FixtureMedia {
    known: BTreeSet<Id<MediaAsset>>,
}

impl FixtureMedia {
    pub fn remember(&mut self) -> Id<MediaAsset> {
        let id = Id::generate();
        self.known.insert(id);

        id
    }
}

impl MediaGateway for FixtureMedia {
    fn resolve_media(&self, id: Id<MediaAsset>) -> Option<MediaFile> {
        self.known.contains(&id).then(|| MediaFile {
            id,
            file_name: format!("{id}.jpg"),
        })
    }
}

///
/// FixtureActions
///

#[derive(Default)]
pub(crate) struct FixtureActions {
    slugs: BTreeMap<Id<ActionTarget>, Slug>,
    by_site: BTreeMap<(Id<Website>, Slug), Id<ActionTarget>>,
}

impl FixtureActions {
    pub fn register(&mut self, website: Id<Website>, raw_slug: &str) -> Id<ActionTarget> {
        let target = Id::generate();
        let key = slug(raw_slug);
        self.slugs.insert(target, key.clone());
        self.by_site.insert((website, key), target);

        target
    }
}

impl ActionTargetResolver for FixtureActions {
    fn slug_of(&self, target: Id<ActionTarget>) -> Option<Slug> {
        self.slugs.get(&target).cloned()
    }

    fn find_by_slug(&self, website: Id<Website>, slug: &Slug) -> Option<Id<ActionTarget>> {
        self.by_site.get(&(website, slug.clone())).copied()
    }
}
