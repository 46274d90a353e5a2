//! Single-pass variant loading.
//!
//! Every record from the source goes through gene membership, picks up the
//! filter outcomes already recorded on its gene and then runs the configured
//! variant filters; what is kept depends on the retention mode.
//! The pass is a fold over an explicit accumulator, so counters live in the
//! fold state rather than in shared cells.

use ferrovar_common::settings::SourceConfig;
use ferrovar_common::{Gene, Result, RetentionMode, VariantEvaluation};
use tracing::debug;

use crate::counter::FilterResultCounter;
use crate::observer::{RunObserver, StreamProgress};
use crate::policy::FilterPolicy;
use crate::steps::VariantFilterStep;

pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

#[derive(Debug, Default)]
pub struct LoadedVariants {
    pub variants: Vec<VariantEvaluation>,
    pub tally: StreamProgress,
}

pub struct VariantLoader<'a> {
    filters: &'a [VariantFilterStep],
    retention: RetentionMode,
    sources: &'a SourceConfig,
    counter: &'a FilterResultCounter,
    observer: &'a dyn RunObserver,
    progress_interval: u64,
}

impl<'a> VariantLoader<'a> {
    pub fn new(
        sources: &'a SourceConfig,
        counter: &'a FilterResultCounter,
        observer: &'a dyn RunObserver,
    ) -> Self {
        Self {
            filters: &[],
            retention: RetentionMode::default(),
            sources,
            counter,
            observer,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_filters(mut self, filters: &'a [VariantFilterStep]) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_retention(mut self, retention: RetentionMode) -> Self {
        self.retention = retention;
        self
    }

    /// 0 disables progress reports.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Stream `records` once. `gene_of` resolves a record's gene; records
    /// whose gene it does not know are dropped unfiltered. A read error aborts
    /// the pass and is returned; the source is dropped on every exit path.
    pub fn load<'g, I, G>(&self, records: I, gene_of: G) -> Result<LoadedVariants>
    where
        I: IntoIterator<Item = Result<VariantEvaluation>>,
        G: Fn(&str) -> Option<&'g Gene>,
    {
        let policy = FilterPolicy::for_retention(self.retention);
        let keep_failed = self.retention != RetentionMode::PassOnly;

        let loaded = records
            .into_iter()
            .try_fold(LoadedVariants::default(), |mut acc, record| -> Result<LoadedVariants> {
                let mut variant = record?;
                acc.tally.streamed += 1;
                if self.progress_interval > 0 && acc.tally.streamed % self.progress_interval == 0 {
                    self.observer.on_progress(acc.tally);
                }

                let Some(gene) = gene_of(&variant.gene_symbol) else {
                    return Ok(acc);
                };
                // Already tallied once per gene.
                for result in gene.filter_results() {
                    variant.add_filter_result(result);
                }

                let passed =
                    policy.apply_variant_filters(self.filters, &mut variant, self.sources, self.counter);
                if passed {
                    acc.tally.passed += 1;
                }
                if passed || keep_failed {
                    acc.variants.push(variant);
                }
                Ok(acc)
            })?;

        debug!(
            streamed = loaded.tally.streamed,
            passed = loaded.tally.passed,
            kept = loaded.variants.len(),
            "Variant stream exhausted"
        );
        Ok(loaded)
    }
}
