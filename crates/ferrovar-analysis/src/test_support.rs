//! Stub steps for unit tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use ferrovar_common::{
    FilterResult, FilterType, Gene, PriorityResult, PriorityType, Result, VariantEvaluation,
};

use crate::steps::{Prioritizer, VariantFilter};

/// Fails variants at the listed positions, passes the rest, and counts calls.
pub struct StubVariantFilter {
    filter_type: FilterType,
    failing_positions: BTreeSet<u32>,
    fail_all: bool,
    calls: AtomicUsize,
}

impl StubVariantFilter {
    pub fn passing(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            failing_positions: BTreeSet::new(),
            fail_all: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_at(filter_type: FilterType, positions: &[u32]) -> Self {
        Self {
            failing_positions: positions.iter().copied().collect(),
            ..Self::passing(filter_type)
        }
    }

    pub fn failing_all(filter_type: FilterType) -> Self {
        Self { fail_all: true, ..Self::passing(filter_type) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VariantFilter for StubVariantFilter {
    fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> FilterResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fails = self.fail_all || self.failing_positions.contains(&variant.position());
        FilterResult::of(self.filter_type, !fails)
    }
}

/// Assigns fixed scores by gene symbol.
pub struct StubPrioritizer {
    priority_type: PriorityType,
    scores: HashMap<String, f64>,
}

impl StubPrioritizer {
    pub fn new(priority_type: PriorityType) -> Self {
        Self { priority_type, scores: HashMap::new() }
    }

    pub fn with_score(mut self, symbol: &str, score: f64) -> Self {
        self.scores.insert(symbol.to_string(), score);
        self
    }
}

impl Prioritizer for StubPrioritizer {
    fn priority_type(&self) -> PriorityType {
        self.priority_type
    }

    fn prioritize(&self, genes: &mut [Gene]) -> Result<()> {
        for gene in genes.iter_mut() {
            let score = self.scores.get(&gene.symbol).copied().unwrap_or(0.0);
            gene.add_priority_result(PriorityResult::new(self.priority_type, score));
        }
        Ok(())
    }
}
