//! Grid row partitioning: a pure function of the Zone's ordered column
//! widths, plus an explicit changed-comparison before any write.

use crate::{
    GRID_ROW_UNITS,
    error::EngineError,
    model::{Col, Zone},
    obs::sink::{self, MetricsEvent},
    store::Transaction,
    tree,
    types::{ColWidth, Id},
};
use std::collections::BTreeMap;

///
/// GridRow
///
/// One visual row: the columns assigned to it, in position order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridRow {
    pub cols: Vec<Id<Col>>,
    pub widths: Vec<ColWidth>,
}

impl GridRow {
    /// Row-width class, column widths joined with '-' ("6-6", "4").
    #[must_use]
    pub fn class(&self) -> String {
        let parts: Vec<String> = self
            .widths
            .iter()
            .map(|width| width.get().to_string())
            .collect();

        parts.join("-")
    }

    #[must_use]
    pub fn width_sum(&self) -> u32 {
        self.widths.iter().map(|width| u32::from(width.get())).sum()
    }
}

///
/// GridRows
///
/// Partition result over one Zone's columns.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridRows {
    rows: Vec<GridRow>,
}

impl GridRows {
    #[must_use]
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Column-id to row-width-class mapping, the persisted shape.
    #[must_use]
    pub fn class_map(&self) -> BTreeMap<Id<Col>, String> {
        let mut map = BTreeMap::new();
        for row in &self.rows {
            let class = row.class();
            for col in &row.cols {
                map.insert(*col, class.clone());
            }
        }

        map
    }
}

/// Group ordered columns into rows whose width sum never exceeds 12.
///
/// Running total walk: a column whose width would push the total past the
/// row budget starts a new row seeded with its own width.
#[must_use]
pub fn partition(cols: &[(Id<Col>, ColWidth)]) -> GridRows {
    let budget = u32::from(GRID_ROW_UNITS);
    let mut rows: Vec<GridRow> = Vec::new();
    let mut total = 0u32;

    for &(id, width) in cols {
        let w = u32::from(width.get());

        match rows.last_mut() {
            Some(row) if total + w <= budget => {
                row.cols.push(id);
                row.widths.push(width);
                total += w;
            }
            _ => {
                rows.push(GridRow {
                    cols: vec![id],
                    widths: vec![width],
                });
                total = w;
            }
        }
    }

    GridRows { rows }
}

/// Recompute a Zone's grid map and persist it only when it changed.
/// Returns whether a write happened; re-running on an unchanged Zone is
/// a no-op.
pub fn refresh_zone(txn: &mut Transaction<'_>, zone: Id<Zone>) -> Result<bool, EngineError> {
    let cols: Vec<(Id<Col>, ColWidth)> = tree::cols_of(txn.store(), zone)
        .into_iter()
        .map(|col| (col.id, col.width))
        .collect();
    let next = partition(&cols).class_map();

    let current = txn.store().get(zone)?;
    if current.grid_map == next {
        sink::record(MetricsEvent::GridRecompute { written: false });
        return Ok(false);
    }

    let mut updated = current.clone();
    updated.grid_map = next;
    txn.persist(updated);
    sink::record(MetricsEvent::GridRecompute { written: true });

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Zone, test_support, tree::attach_zone};
    use proptest::prelude::*;

    fn widths(values: &[u8]) -> Vec<(Id<Col>, ColWidth)> {
        values
            .iter()
            .map(|&w| (Id::generate(), ColWidth::try_from(w).unwrap()))
            .collect()
    }

    #[test]
    fn six_six_four_splits_after_twelve() {
        let cols = widths(&[6, 6, 4]);
        let rows = partition(&cols);

        assert_eq!(rows.rows().len(), 2);
        assert_eq!(rows.rows()[0].class(), "6-6");
        assert_eq!(rows.rows()[1].class(), "4");

        let map = rows.class_map();
        assert_eq!(map[&cols[0].0], "6-6");
        assert_eq!(map[&cols[1].0], "6-6");
        assert_eq!(map[&cols[2].0], "4");
    }

    #[test]
    fn empty_zone_has_no_rows() {
        assert!(partition(&[]).rows().is_empty());
        assert!(partition(&[]).class_map().is_empty());
    }

    #[test]
    fn full_width_columns_each_take_a_row() {
        let cols = widths(&[12, 12]);
        let rows = partition(&cols);

        assert_eq!(rows.rows().len(), 2);
        assert_eq!(rows.rows()[0].class(), "12");
        assert_eq!(rows.rows()[1].class(), "12");
    }

    #[test]
    fn refresh_writes_once_then_holds() {
        let (mut store, site) = test_support::seeded_site(&["fr"], "fr");
        let layout = test_support::empty_layout(&mut store, site);

        let mut txn = Transaction::new(&mut store, "test");
        let zone = attach_zone(&mut txn, Zone::new(layout)).unwrap();
        test_support::attach_cols(&mut txn, zone, &[6, 6, 4]);

        assert!(refresh_zone(&mut txn, zone).unwrap());
        assert!(!refresh_zone(&mut txn, zone).unwrap());
        txn.commit();

        let map = &store.get(zone).unwrap().grid_map;
        assert_eq!(map.len(), 3);
    }

    proptest! {
        #[test]
        fn rows_never_exceed_budget(raw in prop::collection::vec(1u8..=12, 0..24)) {
            let cols = widths(&raw);
            let rows = partition(&cols);

            for row in rows.rows() {
                prop_assert!(row.width_sum() <= u32::from(GRID_ROW_UNITS));
                prop_assert!(!row.cols.is_empty());
            }
        }

        #[test]
        fn every_column_lands_in_exactly_one_row(raw in prop::collection::vec(1u8..=12, 0..24)) {
            let cols = widths(&raw);
            let rows = partition(&cols);

            let assigned: usize = rows.rows().iter().map(|row| row.cols.len()).sum();
            prop_assert_eq!(assigned, cols.len());
            prop_assert_eq!(rows.class_map().len(), cols.len());
        }

        #[test]
        fn partition_is_deterministic(raw in prop::collection::vec(1u8..=12, 0..24)) {
            let cols = widths(&raw);

            prop_assert_eq!(partition(&cols), partition(&cols));
        }
    }
}
