//! Deep subtree duplication: fresh identities, copied value attributes,
//! recursion over children, and cross-website reference re-targeting.
//!
//! Structural persistence failures abort the whole top-level call (one
//! transaction per entry point); reference lookups degrade gracefully —
//! a missing media asset omits the reference, a slug with no match in the
//! destination website clears the action filter instead of dangling.

use crate::{
    context::RequestContext,
    error::EngineError,
    grid,
    model::{
        ActionIntl, Attachment, AttachmentKind, Block, BlockContent, Col, FieldConfig, Layout,
        MediaRelation, Page, PageAlias, Website, Zone,
    },
    obs::sink::{self, MetricsEvent, TreeLevel},
    store::{ActionTargetResolver, LocaleRegistry, MediaGateway, PageStore, Transaction},
    sync, tree,
    types::{Id, Locale, Slug},
};
use serde::Serialize;

///
/// RemapOutcome
///
/// What happened to one locale's action filter during duplication.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum RemapOutcome {
    /// Same-website copy, or no filter to begin with.
    Kept,
    /// Cross-website copy found the slug in the destination website.
    Retargeted,
    /// Cross-website copy found no match; the filter was cleared.
    Cleared,
}

///
/// ActionRemap
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ActionRemap {
    pub locale: Locale,
    pub outcome: RemapOutcome,
}

///
/// Duplicated
///
/// New subtree root plus the action re-targeting record for the caller.
///

#[derive(Clone, Debug)]
pub struct Duplicated<E> {
    pub root: Id<E>,
    pub remaps: Vec<ActionRemap>,
}

///
/// Duplicator
///
/// Duplication engine bound to the external lookup collaborators.
///

pub struct Duplicator<'a> {
    media: &'a dyn MediaGateway,
    actions: &'a dyn ActionTargetResolver,
}

impl<'a> Duplicator<'a> {
    #[must_use]
    pub const fn new(media: &'a dyn MediaGateway, actions: &'a dyn ActionTargetResolver) -> Self {
        Self { media, actions }
    }

    /// Copy one Block into a destination Col at the next position.
    pub fn duplicate_block(
        &self,
        txn: &mut Transaction<'_>,
        _ctx: &RequestContext,
        source: Id<Block>,
        dest_col: Id<Col>,
    ) -> Result<Duplicated<Block>, EngineError> {
        let source_block = txn.store().get(source)?.clone();
        let dest = txn.store().get(dest_col)?;
        let dest_website = tree::owning_website_of_col(txn.store(), dest)?;
        let source_website = tree::owning_website_of_block(txn.store(), &source_block)?;
        let cross_site = dest_website != source_website;
        let dest_locales = txn.store().locales_for(dest_website)?;

        let mut remaps = Vec::new();
        let content = match source_block.content {
            BlockContent::Text => BlockContent::Text,
            BlockContent::Media { relations } => BlockContent::Media {
                relations: self.copy_relations(relations, cross_site, &dest_locales),
            },
            BlockContent::Card { relations } => BlockContent::Card {
                relations: self.copy_relations(relations, cross_site, &dest_locales),
            },
            BlockContent::FormField { config } => BlockContent::FormField {
                config: copy_field_config(config, cross_site, &dest_locales),
            },
            BlockContent::Action { intls } => BlockContent::Action {
                intls: self.remap_actions(
                    intls,
                    cross_site,
                    dest_website,
                    &dest_locales,
                    &mut remaps,
                ),
            },
        };

        let mut block = Block::new(dest_col, content);
        block.intls = filter_locales(source_block.intls, cross_site, &dest_locales, |intl| {
            &intl.locale
        });

        let root = tree::attach_block(txn, block)?;
        sync::sync_block(txn, root)?;
        sink::record(MetricsEvent::DuplicateApplied {
            level: TreeLevel::Block,
        });

        Ok(Duplicated { root, remaps })
    }

    /// Copy one Col and its Blocks into a destination Zone.
    ///
    /// The destination Zone's grid map is the caller's to refresh once all
    /// structural changes are in.
    pub fn duplicate_col(
        &self,
        txn: &mut Transaction<'_>,
        ctx: &RequestContext,
        source: Id<Col>,
        dest_zone: Id<Zone>,
    ) -> Result<Duplicated<Col>, EngineError> {
        let source_col = txn.store().get(source)?.clone();

        let mut col = Col::new(dest_zone, source_col.width);
        col.background = source_col.background.clone();
        col.standardize_blocks = source_col.standardize_blocks;
        let root = tree::attach_col(txn, col)?;

        let blocks: Vec<Id<Block>> = tree::blocks_of(txn.store(), source_col.id)
            .into_iter()
            .map(|block| block.id)
            .collect();
        let mut remaps = Vec::new();
        for block in blocks {
            let dup = self.duplicate_block(txn, ctx, block, root)?;
            remaps.extend(dup.remaps);
        }

        sink::record(MetricsEvent::DuplicateApplied {
            level: TreeLevel::Col,
        });

        Ok(Duplicated { root, remaps })
    }

    /// Copy one Zone into a destination Layout at the next position, then
    /// its Cols; the new Zone's grid map is recomputed once all Cols are
    /// attached.
    pub fn duplicate_zone(
        &self,
        txn: &mut Transaction<'_>,
        ctx: &RequestContext,
        source: Id<Zone>,
        dest_layout: Id<Layout>,
    ) -> Result<Duplicated<Zone>, EngineError> {
        let source_zone = txn.store().get(source)?.clone();
        let dest_website = txn.store().get(dest_layout)?.website;
        let source_website = tree::owning_website_of_zone(txn.store(), &source_zone)?;
        let cross_site = dest_website != source_website;
        let dest_locales = txn.store().locales_for(dest_website)?;

        let mut zone = Zone::new(dest_layout);
        zone.full_width = source_zone.full_width;
        zone.padding = source_zone.padding.clone();
        zone.margin = source_zone.margin.clone();
        zone.background = source_zone.background.clone();
        zone.intls = filter_locales(source_zone.intls, cross_site, &dest_locales, |intl| {
            &intl.locale
        });

        let root = tree::attach_zone(txn, zone)?;
        sync::sync_zone(txn, root)?;

        let cols: Vec<Id<Col>> = tree::cols_of(txn.store(), source_zone.id)
            .into_iter()
            .map(|col| col.id)
            .collect();
        let mut remaps = Vec::new();
        for col in cols {
            let dup = self.duplicate_col(txn, ctx, col, root)?;
            remaps.extend(dup.remaps);
        }
        txn.checkpoint("duplicate-zone-cols")?;

        grid::refresh_zone(txn, root)?;
        tree::touch_layout(txn, dest_layout, ctx.now)?;
        sink::record(MetricsEvent::DuplicateApplied {
            level: TreeLevel::Zone,
        });

        Ok(Duplicated { root, remaps })
    }

    /// Fill a pre-built Layout shell from a source Layout, re-homed onto
    /// the destination website.
    pub fn duplicate_layout(
        &self,
        txn: &mut Transaction<'_>,
        ctx: &RequestContext,
        mut shell: Layout,
        source: Id<Layout>,
        dest_website: Id<Website>,
    ) -> Result<Duplicated<Layout>, EngineError> {
        txn.store().get(dest_website)?;
        txn.store().get(source)?;

        shell.website = dest_website;
        shell.updated_at = ctx.now;
        let root = shell.id;
        txn.persist(shell);

        let zones: Vec<Id<Zone>> = tree::zones_of(txn.store(), source)
            .into_iter()
            .map(|zone| zone.id)
            .collect();
        let mut remaps = Vec::new();
        for zone in zones {
            let dup = self.duplicate_zone(txn, ctx, zone, root)?;
            remaps.extend(dup.remaps);
        }

        sink::record(MetricsEvent::DuplicateApplied {
            level: TreeLevel::Layout,
        });

        Ok(Duplicated { root, remaps })
    }

    /// Copy a Page (attributes, aliases, nesting slot) and its whole
    /// Layout tree into a destination website.
    pub fn duplicate_page(
        &self,
        txn: &mut Transaction<'_>,
        ctx: &RequestContext,
        source: Id<Page>,
        dest_website: Id<Website>,
        dest_parent: Option<Id<Page>>,
    ) -> Result<Duplicated<Page>, EngineError> {
        let source_page = txn.store().get(source)?.clone();
        let dest_site = txn.store().get(dest_website)?.clone();

        let level = match dest_parent {
            Some(parent) => {
                let parent_page = txn.store().get(parent)?;
                if parent_page.website != dest_website {
                    return Err(EngineError::tree_invariant(format!(
                        "destination parent {parent} belongs to another website"
                    )));
                }
                parent_page.level + 1
            }
            None => 1,
        };
        let position = u32::try_from(tree::pages_under(txn.store(), dest_website, dest_parent).len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);

        let slug = unique_page_slug(txn.store(), dest_website, &source_page.slug);
        let aliases: Vec<PageAlias> = dest_site
            .locales
            .iter()
            .map(|locale| {
                let base = source_page
                    .alias(locale)
                    .map_or_else(|| source_page.slug.clone(), |alias| alias.alias.clone());
                PageAlias {
                    locale: locale.clone(),
                    alias: unique_alias(txn.store(), dest_website, locale, &base),
                }
            })
            .collect();

        let page_id = Id::<Page>::generate();
        let shell_name = txn.store().get(source_page.layout)?.name.clone();
        let shell = Layout::new(dest_website, shell_name).attached_to(Attachment {
            kind: AttachmentKind::Page,
            target: page_id.ulid(),
        });
        let layout_dup = self.duplicate_layout(txn, ctx, shell, source_page.layout, dest_website)?;

        let page = Page {
            id: page_id,
            website: dest_website,
            parent: dest_parent,
            level,
            position,
            name: source_page.name.clone(),
            slug,
            aliases,
            layout: layout_dup.root,
            updated_at: ctx.now,
        };
        txn.persist(page);
        sink::record(MetricsEvent::DuplicateApplied {
            level: TreeLevel::Page,
        });

        Ok(Duplicated {
            root: page_id,
            remaps: layout_dup.remaps,
        })
    }

    // Copy media relations; a reference the gateway can no longer resolve
    // is omitted rather than failing the duplication.
    fn copy_relations(
        &self,
        relations: Vec<MediaRelation>,
        cross_site: bool,
        dest_locales: &[Locale],
    ) -> Vec<MediaRelation> {
        filter_locales(relations, cross_site, dest_locales, |relation| {
            &relation.locale
        })
        .into_iter()
        .map(|mut relation| {
            relation.media = relation
                .media
                .filter(|&media| self.media.resolve_media(media).is_some());
            relation
        })
        .collect()
    }

    fn remap_actions(
        &self,
        intls: Vec<ActionIntl>,
        cross_site: bool,
        dest_website: Id<Website>,
        dest_locales: &[Locale],
        remaps: &mut Vec<ActionRemap>,
    ) -> Vec<ActionIntl> {
        filter_locales(intls, cross_site, dest_locales, |intl| &intl.locale)
            .into_iter()
            .map(|mut intl| {
                let outcome = match intl.action_filter {
                    Some(target) if cross_site => {
                        let resolved = self
                            .actions
                            .slug_of(target)
                            .and_then(|slug| self.actions.find_by_slug(dest_website, &slug));
                        match resolved {
                            Some(new_target) => {
                                intl.action_filter = Some(new_target);
                                RemapOutcome::Retargeted
                            }
                            None => {
                                intl.action_filter = None;
                                RemapOutcome::Cleared
                            }
                        }
                    }
                    _ => RemapOutcome::Kept,
                };
                remaps.push(ActionRemap {
                    locale: intl.locale.clone(),
                    outcome,
                });
                intl
            })
            .collect()
    }
}

// Locale-scoped records crossing a website boundary keep only the locales
// the destination website configures; same-website copies keep everything.
fn filter_locales<T>(
    records: Vec<T>,
    cross_site: bool,
    dest_locales: &[Locale],
    locale_of: impl Fn(&T) -> &Locale,
) -> Vec<T> {
    if !cross_site {
        return records;
    }

    records
        .into_iter()
        .filter(|record| dest_locales.contains(locale_of(record)))
        .collect()
}

fn copy_field_config(config: FieldConfig, cross_site: bool, dest_locales: &[Locale]) -> FieldConfig {
    FieldConfig {
        required: config.required,
        expanded: config.expanded,
        multiple: config.multiple,
        values: config
            .values
            .into_iter()
            .map(|mut value| {
                value.intls =
                    filter_locales(value.intls, cross_site, dest_locales, |intl| &intl.locale);
                value
            })
            .collect(),
    }
}

fn unique_page_slug(store: &PageStore, website: Id<Website>, base: &Slug) -> Slug {
    let taken = |candidate: &Slug| {
        store
            .iter::<Page>()
            .any(|page| page.website == website && &page.slug == candidate)
    };

    unique_slug(base, taken)
}

fn unique_alias(store: &PageStore, website: Id<Website>, locale: &Locale, base: &Slug) -> Slug {
    let taken = |candidate: &Slug| {
        store.iter::<Page>().any(|page| {
            page.website == website
                && page
                    .aliases
                    .iter()
                    .any(|alias| &alias.locale == locale && &alias.alias == candidate)
        })
    };

    unique_slug(base, taken)
}

fn unique_slug(base: &Slug, taken: impl Fn(&Slug) -> bool) -> Slug {
    if !taken(base) {
        return base.clone();
    }

    let mut n = 2;
    loop {
        let candidate = base.with_suffix(n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
