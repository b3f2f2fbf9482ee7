//! Locale/media synchronization: every locale configured on the owning
//! website gets its localized records, created lazily and exactly once
//! per (owner, locale[, position]) tuple. First creation copies the
//! default locale's real content into the placeholder; an editor's
//! explicit per-locale choice is never overwritten afterward.

use crate::{
    error::EngineError,
    model::{
        ActionIntl, Block, BlockIntl, FieldValueIntl, MediaRelation, Website, Zone, ZoneIntl,
    },
    obs::sink::{self, MetricsEvent},
    store::{LocaleRegistry, Transaction},
    tree,
    types::{Id, Locale},
};

///
/// SyncOutcome
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SyncOutcome {
    pub created: u32,
    pub pruned: u32,
}

impl SyncOutcome {
    #[must_use]
    pub const fn is_noop(self) -> bool {
        self.created == 0 && self.pruned == 0
    }

    const fn absorb(&mut self, other: Self) {
        self.created += other.created;
        self.pruned += other.pruned;
    }
}

/// Ensure a Zone carries one intl per configured locale.
pub fn sync_zone(txn: &mut Transaction<'_>, zone: Id<Zone>) -> Result<SyncOutcome, EngineError> {
    let current = txn.store().get(zone)?.clone();
    let website = tree::owning_website_of_zone(txn.store(), &current)?;
    let locales = txn.store().locales_for(website)?;
    let default = txn.store().default_locale(website)?;

    let mut next = current;
    let mut outcome = SyncOutcome::default();

    for locale in &locales {
        if next.intl(locale).is_some() {
            continue;
        }

        let mut intl = ZoneIntl::empty(locale.clone());
        if *locale != default {
            if let Some(source) = next.intl(&default) {
                if source.has_content() {
                    intl.heading = source.heading.clone();
                    intl.intro = source.intro.clone();
                }
            }
        }
        next.intls.push(intl);
        outcome.created += 1;
    }

    if !outcome.is_noop() {
        txn.persist(next);
    }
    record(outcome);

    Ok(outcome)
}

/// Ensure a Block carries its localized records for every configured
/// locale: translatable intls, media relations at each required position,
/// action intls, and form-field value intls.
pub fn sync_block(txn: &mut Transaction<'_>, block: Id<Block>) -> Result<SyncOutcome, EngineError> {
    let current = txn.store().get(block)?.clone();
    let website_id = tree::owning_website_of_block(txn.store(), &current)?;
    let website = txn.store().get(website_id)?.clone();

    let mut next = current;
    let mut outcome = SyncOutcome::default();

    outcome.absorb(sync_block_intls(&mut next, &website));
    if let Some(relations) = next.content.relations_mut() {
        outcome.absorb(sync_relations(relations, &website));
    }
    if let Some(intls) = next.content.action_intls_mut() {
        outcome.absorb(sync_action_intls(intls, &website));
    }
    if let Some(config) = next.content.field_config_mut() {
        for value in &mut config.values {
            outcome.absorb(sync_field_value_intls(&mut value.intls, &website));
        }
    }

    if !outcome.is_noop() {
        txn.persist(next);
    }
    record(outcome);

    Ok(outcome)
}

fn sync_block_intls(block: &mut Block, website: &Website) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for locale in &website.locales {
        if block.intl(locale).is_some() {
            continue;
        }

        let mut intl = BlockIntl::empty(locale.clone());
        if *locale != website.default_locale {
            if let Some(source) = block.intl(&website.default_locale) {
                if source.has_content() {
                    intl.heading = source.heading.clone();
                    intl.body = source.body.clone();
                }
            }
        }
        block.intls.push(intl);
        outcome.created += 1;
    }

    outcome
}

fn sync_relations(relations: &mut Vec<MediaRelation>, website: &Website) -> SyncOutcome {
    let cap = website.media_positions();
    let mut outcome = SyncOutcome::default();

    // prune duplicates of the same (locale, position) and anything past
    // the position cap before filling gaps
    let mut seen: Vec<(Locale, u32)> = Vec::new();
    let before = relations.len();
    relations.retain(|relation| {
        let key = (relation.locale.clone(), relation.position);
        if relation.position == 0 || relation.position > cap || seen.contains(&key) {
            return false;
        }
        seen.push(key);
        true
    });
    outcome.pruned += (before - relations.len()) as u32;

    for locale in &website.locales {
        for position in 1..=cap {
            let exists = relations
                .iter()
                .any(|relation| &relation.locale == locale && relation.position == position);
            if exists {
                continue;
            }

            let mut relation = MediaRelation::empty(locale.clone(), position);
            if *locale != website.default_locale {
                relation.media = relations
                    .iter()
                    .find(|source| {
                        source.locale == website.default_locale && source.position == position
                    })
                    .and_then(|source| source.media);
            }
            relations.push(relation);
            outcome.created += 1;
        }
    }

    if !outcome.is_noop() {
        relations.sort_by(|a, b| (&a.locale, a.position).cmp(&(&b.locale, b.position)));
    }

    outcome
}

fn sync_action_intls(intls: &mut Vec<ActionIntl>, website: &Website) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for locale in &website.locales {
        if intls.iter().any(|intl| &intl.locale == locale) {
            continue;
        }

        let mut intl = ActionIntl::empty(locale.clone());
        if *locale != website.default_locale {
            if let Some(source) = intls
                .iter()
                .find(|intl| intl.locale == website.default_locale)
            {
                if source.has_content() {
                    intl.label = source.label.clone();
                    // same website: the filter stays valid across locales
                    intl.action_filter = source.action_filter;
                }
            }
        }
        intls.push(intl);
        outcome.created += 1;
    }

    outcome
}

fn sync_field_value_intls(intls: &mut Vec<FieldValueIntl>, website: &Website) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for locale in &website.locales {
        if intls.iter().any(|intl| &intl.locale == locale) {
            continue;
        }

        let mut intl = FieldValueIntl::empty(locale.clone());
        if *locale != website.default_locale {
            if let Some(source) = intls
                .iter()
                .find(|intl| intl.locale == website.default_locale)
            {
                intl.label = source.label.clone();
            }
        }
        intls.push(intl);
        outcome.created += 1;
    }

    outcome
}

fn record(outcome: SyncOutcome) {
    if !outcome.is_noop() {
        sink::record(MetricsEvent::LocaleSync {
            created: u64::from(outcome.created),
            pruned: u64::from(outcome.pruned),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{BlockContent, FieldConfig, FieldValue},
        test_support,
        types::Id,
    };

    #[test]
    fn zone_sync_fills_all_locales_then_holds() {
        let mut fx = test_support::two_block_fixture_with_locales(&["fr", "en", "de"], "fr");
        let zone = fx.zones[0];

        let mut txn = Transaction::new(&mut fx.store, "test");
        let first = sync_zone(&mut txn, zone).unwrap();
        assert_eq!(first.created, 3);

        let second = sync_zone(&mut txn, zone).unwrap();
        assert!(second.is_noop());
        txn.commit();

        let intls = &fx.store.get(zone).unwrap().intls;
        assert_eq!(intls.len(), 3);
    }

    #[test]
    fn placeholder_copies_default_locale_content_once() {
        let mut fx = test_support::two_block_fixture_with_locales(&["fr", "en"], "fr");
        let zone = fx.zones[0];

        {
            let mut seeded = fx.store.get(zone).unwrap().clone();
            seeded.intls.push(crate::model::ZoneIntl {
                locale: crate::types::Locale::new("fr").unwrap(),
                heading: Some("Bonjour".into()),
                intro: None,
            });
            let mut txn = Transaction::new(&mut fx.store, "seed");
            txn.persist(seeded);
            txn.commit();
        }

        let mut txn = Transaction::new(&mut fx.store, "test");
        sync_zone(&mut txn, zone).unwrap();
        txn.commit();

        let en = crate::types::Locale::new("en").unwrap();
        let intl = fx.store.get(zone).unwrap().intl(&en).unwrap().clone();
        assert_eq!(intl.heading.as_deref(), Some("Bonjour"));

        // editor overrides stay untouched on later runs
        let mut edited = fx.store.get(zone).unwrap().clone();
        for intl in &mut edited.intls {
            if intl.locale == en {
                intl.heading = Some("Hello".into());
            }
        }
        let mut txn = Transaction::new(&mut fx.store, "edit");
        txn.persist(edited);
        txn.commit();

        let mut txn = Transaction::new(&mut fx.store, "resync");
        assert!(sync_zone(&mut txn, zone).unwrap().is_noop());
        txn.commit();
        assert_eq!(
            fx.store.get(zone).unwrap().intl(&en).unwrap().heading.as_deref(),
            Some("Hello")
        );
    }

    #[test]
    fn media_secondary_caps_relations_at_two() {
        let mut fx = test_support::media_block_fixture(&["fr", "en"], "fr", true);
        let block = fx.blocks[0];

        // seed a locale with three relations; positions 1..=2 survive
        {
            let mut seeded = fx.store.get(block).unwrap().clone();
            let relations = seeded.content.relations_mut().unwrap();
            let fr = crate::types::Locale::new("fr").unwrap();
            for position in 1..=3 {
                relations.push(MediaRelation {
                    locale: fr.clone(),
                    position,
                    media: Some(Id::generate()),
                });
            }
            let mut txn = Transaction::new(&mut fx.store, "seed");
            txn.persist(seeded);
            txn.commit();
        }

        let mut txn = Transaction::new(&mut fx.store, "test");
        let outcome = sync_block(&mut txn, block).unwrap();
        txn.commit();

        assert_eq!(outcome.pruned, 1);
        let stored = fx.store.get(block).unwrap();
        let relations = stored.content.relations().unwrap();
        for locale in ["fr", "en"] {
            let locale = crate::types::Locale::new(locale).unwrap();
            let count = relations.iter().filter(|r| r.locale == locale).count();
            assert_eq!(count, 2);
        }
    }

    #[test]
    fn regular_site_gets_one_relation_per_locale() {
        let mut fx = test_support::media_block_fixture(&["fr", "en"], "fr", false);
        let block = fx.blocks[0];

        let mut txn = Transaction::new(&mut fx.store, "test");
        let outcome = sync_block(&mut txn, block).unwrap();
        txn.commit();

        assert_eq!(outcome.created, 2 + 2); // intls + one relation per locale
        let stored = fx.store.get(block).unwrap();
        assert_eq!(stored.content.relations().unwrap().len(), 2);
    }

    #[test]
    fn form_field_values_get_locale_labels() {
        let mut fx = test_support::two_block_fixture_with_locales(&["fr", "en"], "fr");
        let col = fx.cols[0];

        let config = FieldConfig {
            required: true,
            expanded: false,
            multiple: false,
            values: vec![FieldValue {
                position: 1,
                intls: vec![FieldValueIntl {
                    locale: crate::types::Locale::new("fr").unwrap(),
                    label: Some("Oui".into()),
                }],
            }],
        };
        let block = {
            let mut txn = Transaction::new(&mut fx.store, "seed");
            let id = crate::tree::attach_block(
                &mut txn,
                crate::model::Block::new(col, BlockContent::FormField { config }),
            )
            .unwrap();
            txn.commit();
            id
        };

        let mut txn = Transaction::new(&mut fx.store, "test");
        sync_block(&mut txn, block).unwrap();
        txn.commit();

        let stored = fx.store.get(block).unwrap();
        let BlockContent::FormField { config } = &stored.content else {
            panic!("expected form field");
        };
        let en = crate::types::Locale::new("en").unwrap();
        let label = config.values[0]
            .intls
            .iter()
            .find(|intl| intl.locale == en)
            .and_then(|intl| intl.label.clone());
        assert_eq!(label.as_deref(), Some("Oui"));
    }
}
