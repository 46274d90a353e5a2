//! Filter execution policies and the gene filter runner.

use ferrovar_common::settings::SourceConfig;
use ferrovar_common::{FilterResult, FilterStatus, Gene, RetentionMode, VariantEvaluation};
use rayon::prelude::*;
use tracing::debug;

use crate::counter::FilterResultCounter;
use crate::steps::{GeneFilter, VariantFilterStep};

/// How a sequence of variant filters is applied to one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPolicy {
    /// Every filter runs on every variant, so reports show all reasons a
    /// variant failed.
    NonDestructive,
    /// Stop at the first failure.
    ShortCircuit,
}

impl FilterPolicy {
    pub fn for_retention(mode: RetentionMode) -> Self {
        match mode {
            RetentionMode::Full => FilterPolicy::NonDestructive,
            RetentionMode::Sparse | RetentionMode::PassOnly => FilterPolicy::ShortCircuit,
        }
    }

    /// Run `filters` in order against `variant`, recording each outcome on
    /// the variant and in `counter`. A filter type already recorded on the
    /// variant is not run again. Returns whether the variant passed overall.
    pub fn apply_variant_filters(
        self,
        filters: &[VariantFilterStep],
        variant: &mut VariantEvaluation,
        sources: &SourceConfig,
        counter: &FilterResultCounter,
    ) -> bool {
        for step in filters {
            if self == FilterPolicy::ShortCircuit && !variant.passed_filters() {
                break;
            }
            if variant.filter_status(step.filter_type()) != FilterStatus::NotRun {
                continue;
            }
            let result = step.apply(variant, sources);
            if variant.add_filter_result(result) {
                counter.log_result(result);
            }
        }
        variant.passed_filters()
    }
}

/// Run a gene filter over every gene not yet evaluated by its filter type.
///
/// The gene's result is copied onto each of its variants so per-variant
/// queries see gene-level failures too. One counter increment per gene.
pub fn run_gene_filter(
    filter: &dyn GeneFilter,
    genes: &mut [Gene],
    counter: &FilterResultCounter,
    parallel: bool,
) {
    let filter_type = filter.filter_type();
    let apply = |gene: &mut Gene| {
        if gene.filter_status(filter_type) != FilterStatus::NotRun {
            return;
        }
        let result = filter.run_filter(gene);
        record_gene_result(gene, result, counter);
    };

    if parallel {
        genes.par_iter_mut().for_each(apply);
    } else {
        genes.iter_mut().for_each(apply);
    }
    debug!(filter = %filter_type, genes = genes.len(), "Gene filter applied");
}

fn record_gene_result(gene: &mut Gene, result: FilterResult, counter: &FilterResultCounter) {
    if !gene.add_filter_result(result) {
        return;
    }
    for variant in gene.variants_mut() {
        variant.add_filter_result(result);
    }
    counter.log_result(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ferrovar_common::FilterType;
    use ferrovar_test_utils::{gene_with_variants, snv};

    use crate::filters::GeneSymbolFilter;
    use crate::test_support::StubVariantFilter;

    fn steps(filters: Vec<StubVariantFilter>) -> (Vec<VariantFilterStep>, Vec<Arc<StubVariantFilter>>) {
        let arcs: Vec<Arc<StubVariantFilter>> = filters.into_iter().map(Arc::new).collect();
        let steps = arcs
            .iter()
            .map(|f| VariantFilterStep::new(f.clone() as Arc<dyn crate::steps::VariantFilter>))
            .collect();
        (steps, arcs)
    }

    #[test]
    fn test_policy_for_retention() {
        assert_eq!(FilterPolicy::for_retention(RetentionMode::Full), FilterPolicy::NonDestructive);
        assert_eq!(FilterPolicy::for_retention(RetentionMode::Sparse), FilterPolicy::ShortCircuit);
        assert_eq!(FilterPolicy::for_retention(RetentionMode::PassOnly), FilterPolicy::ShortCircuit);
    }

    #[test]
    fn test_non_destructive_runs_every_filter() {
        let (steps, stubs) = steps(vec![
            StubVariantFilter::failing_all(FilterType::Quality),
            StubVariantFilter::passing(FilterType::Frequency),
        ]);
        let counter = FilterResultCounter::new();
        let mut variant = snv("A", 1, 10);

        let passed = FilterPolicy::NonDestructive.apply_variant_filters(
            &steps,
            &mut variant,
            &SourceConfig::default(),
            &counter,
        );

        assert!(!passed);
        assert_eq!(stubs[1].calls(), 1);
        assert!(variant.failed_filter(FilterType::Quality));
        assert!(variant.passed_filter(FilterType::Frequency));
        assert_eq!(counter.filters_run().len(), 2);
    }

    #[test]
    fn test_short_circuit_stops_at_first_failure() {
        let (steps, stubs) = steps(vec![
            StubVariantFilter::failing_all(FilterType::Quality),
            StubVariantFilter::passing(FilterType::Frequency),
        ]);
        let counter = FilterResultCounter::new();
        let mut variant = snv("A", 1, 10);

        FilterPolicy::ShortCircuit.apply_variant_filters(
            &steps,
            &mut variant,
            &SourceConfig::default(),
            &counter,
        );

        assert_eq!(stubs[1].calls(), 0);
        assert_eq!(variant.filter_status(FilterType::Frequency), FilterStatus::NotRun);
        assert!(counter.filter_result_count(FilterType::Frequency).is_none());
    }

    #[test]
    fn test_filter_already_recorded_is_not_rerun() {
        let (steps, stubs) = steps(vec![StubVariantFilter::failing_all(FilterType::Quality)]);
        let counter = FilterResultCounter::new();
        let mut variant = snv("A", 1, 10);
        variant.add_filter_result(FilterResult::pass(FilterType::Quality));

        let passed = FilterPolicy::NonDestructive.apply_variant_filters(
            &steps,
            &mut variant,
            &SourceConfig::default(),
            &counter,
        );

        assert!(passed);
        assert_eq!(stubs[0].calls(), 0);
        assert!(counter.is_empty());
    }

    #[test]
    fn test_gene_filter_propagates_to_variants() {
        let mut genes = vec![
            gene_with_variants("KEEP", 1, vec![snv("KEEP", 1, 1), snv("KEEP", 1, 2)]),
            gene_with_variants("DROP", 2, vec![snv("DROP", 2, 3)]),
        ];
        let counter = FilterResultCounter::new();

        run_gene_filter(&GeneSymbolFilter::new(["KEEP"]), &mut genes, &counter, false);

        assert!(genes[0].passed_filters());
        assert!(!genes[1].passed_filters());
        assert!(genes[0].variants().iter().all(|v| v.passed_filter(FilterType::GeneSymbol)));
        assert!(genes[1].variants()[0].failed_filter(FilterType::GeneSymbol));

        let count = counter.filter_result_count(FilterType::GeneSymbol).unwrap();
        assert_eq!((count.pass_count, count.fail_count), (1, 1));
    }

    #[test]
    fn test_parallel_gene_filter_matches_sequential() {
        let build = || {
            (0..50u32)
                .map(|i| gene_with_variants(&format!("G{i}"), i, vec![snv(&format!("G{i}"), i, i)]))
                .collect::<Vec<_>>()
        };
        let filter = GeneSymbolFilter::new(["G1", "G7", "G42"]);
        let (mut seq, mut par) = (build(), build());
        let (c1, c2) = (FilterResultCounter::new(), FilterResultCounter::new());

        run_gene_filter(&filter, &mut seq, &c1, false);
        run_gene_filter(&filter, &mut par, &c2, true);

        let passed = |genes: &[Gene]| -> Vec<String> {
            genes.iter().filter(|g| g.passed_filters()).map(|g| g.symbol.clone()).collect()
        };
        assert_eq!(passed(&seq), passed(&par));
        assert_eq!(c1.filter_result_counts(), c2.filter_result_counts());
    }
}
