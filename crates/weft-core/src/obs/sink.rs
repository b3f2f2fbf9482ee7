//! Metrics sink boundary.
//!
//! Engine logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink; this
//! module is the only bridge between the operations and metrics state.

use crate::obs::metrics::{self, CounterState};
use std::cell::Cell;

///
/// TreeLevel
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TreeLevel {
    Layout,
    Zone,
    Col,
    Block,
    Page,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    RepositionApplied { level: TreeLevel, moved: u64 },
    GridRecompute { written: bool },
    DuplicateApplied { level: TreeLevel },
    LocaleSync { created: u64, pruned: u64 },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::RepositionApplied { moved, .. } => {
                metrics::with_state_mut(|m| {
                    m.reposition_batches = m.reposition_batches.saturating_add(1);
                    m.entities_moved = m.entities_moved.saturating_add(moved);
                });
            }

            MetricsEvent::GridRecompute { written } => {
                metrics::with_state_mut(|m| {
                    m.grid_recomputes = m.grid_recomputes.saturating_add(1);
                    if written {
                        m.grid_writes = m.grid_writes.saturating_add(1);
                    }
                });
            }

            MetricsEvent::DuplicateApplied { level } => {
                metrics::with_state_mut(|m| {
                    let slot = match level {
                        TreeLevel::Layout => &mut m.duplicated_layouts,
                        TreeLevel::Zone => &mut m.duplicated_zones,
                        TreeLevel::Col => &mut m.duplicated_cols,
                        TreeLevel::Block => &mut m.duplicated_blocks,
                        TreeLevel::Page => &mut m.duplicated_pages,
                    };
                    *slot = slot.saturating_add(1);
                });
            }

            MetricsEvent::LocaleSync { created, pruned } => {
                metrics::with_state_mut(|m| {
                    m.locale_records_created = m.locale_records_created.saturating_add(created);
                    m.media_relations_pruned = m.media_relations_pruned.saturating_add(pruned);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

thread_local! {
    static SINK_OVERRIDE: Cell<Option<&'static dyn MetricsSink>> = const { Cell::new(None) };
}

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(Cell::get);
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Run a closure with a temporary metrics sink override.
/// The previous override is always restored, including on unwind.
pub(crate) fn with_metrics_sink<T>(sink: &'static dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<&'static dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| cell.set(self.0));
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.replace(Some(sink)));
    let _guard = Guard(prev);

    f()
}

/// Snapshot the current metrics counters.
#[must_use]
pub fn metrics_report() -> CounterState {
    metrics::report()
}

/// Reset all metrics counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}
