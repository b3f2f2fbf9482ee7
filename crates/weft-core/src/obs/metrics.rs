//! Process-local metrics state. Engine logic never writes here directly;
//! everything arrives through the sink boundary in [`crate::obs::sink`].

use serde::Serialize;
use std::cell::RefCell;

///
/// CounterState
///
/// Monotonic operation counters since the last reset.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CounterState {
    pub reposition_batches: u64,
    pub entities_moved: u64,
    pub grid_recomputes: u64,
    pub grid_writes: u64,
    pub duplicated_layouts: u64,
    pub duplicated_zones: u64,
    pub duplicated_cols: u64,
    pub duplicated_blocks: u64,
    pub duplicated_pages: u64,
    pub locale_records_created: u64,
    pub media_relations_pruned: u64,
}

thread_local! {
    static STATE: RefCell<CounterState> = RefCell::new(CounterState::default());
}

pub(crate) fn with_state_mut<T>(f: impl FnOnce(&mut CounterState) -> T) -> T {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Snapshot the current counters for endpoint/test plumbing.
#[must_use]
pub fn report() -> CounterState {
    STATE.with(|state| state.borrow().clone())
}

/// Reset all counters.
pub fn reset_all() {
    STATE.with(|state| *state.borrow_mut() = CounterState::default());
}
