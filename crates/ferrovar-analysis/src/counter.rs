//! Pass/fail tallies per filter type.
//!
//! Shared by every filter invocation in a run, possibly from several threads
//! at once. Keys keep first-seen order so reports list filters in the order
//! they first ran.

use std::sync::atomic::{AtomicU64, Ordering};

use ferrovar_common::{FilterResult, FilterType};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterResultCount {
    pub filter_type: FilterType,
    pub pass_count: u64,
    pub fail_count: u64,
}

impl FilterResultCount {
    pub fn total(&self) -> u64 {
        self.pass_count + self.fail_count
    }
}

#[derive(Default)]
struct Tally {
    pass: AtomicU64,
    fail: AtomicU64,
}

impl Tally {
    fn record(&self, passed: bool) {
        let slot = if passed { &self.pass } else { &self.fail };
        slot.fetch_add(1, Ordering::Relaxed);
    }
}

/// Thread-safe aggregate of filter outcomes.
///
/// Increments take the read lock; the write lock is only held to insert a
/// filter type seen for the first time.
#[derive(Default)]
pub struct FilterResultCounter {
    tallies: RwLock<IndexMap<FilterType, Tally>>,
}

impl FilterResultCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_result(&self, result: FilterResult) {
        self.log(result.filter_type, result.passed);
    }

    pub fn log(&self, filter_type: FilterType, passed: bool) {
        {
            let tallies = self.tallies.read();
            if let Some(tally) = tallies.get(&filter_type) {
                tally.record(passed);
                return;
            }
        }
        // Another writer may have inserted the key between the two locks.
        let mut tallies = self.tallies.write();
        tallies.entry(filter_type).or_default().record(passed);
    }

    pub fn filter_result_count(&self, filter_type: FilterType) -> Option<FilterResultCount> {
        self.tallies
            .read()
            .get(&filter_type)
            .map(|tally| snapshot(filter_type, tally))
    }

    /// Snapshot of every tally in first-seen order.
    pub fn filter_result_counts(&self) -> Vec<FilterResultCount> {
        self.tallies
            .read()
            .iter()
            .map(|(filter_type, tally)| snapshot(*filter_type, tally))
            .collect()
    }

    pub fn filters_run(&self) -> Vec<FilterType> {
        self.tallies.read().keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.read().is_empty()
    }
}

fn snapshot(filter_type: FilterType, tally: &Tally) -> FilterResultCount {
    FilterResultCount {
        filter_type,
        pass_count: tally.pass.load(Ordering::Relaxed),
        fail_count: tally.fail.load(Ordering::Relaxed),
    }
}
