//! Analysis orchestration.
//!
//! Steps run group by group. The first variant filter group is fused into
//! the variant stream; later ones run over the variants already in memory.
//! Inheritance modes are computed once, right before the first group that
//! depends on them.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use ferrovar_common::{
    AnalysisSettings, Gene, GeneIdentifier, Result, RetentionMode, SampleData, VariantEvaluation,
};
use ferrovar_ranker::{scorer_for, sort_by_score, top_variant, ScoreWeights};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::analysis::{Analysis, AnalysisResults};
use crate::batching::{group_steps, StepGroup};
use crate::counter::FilterResultCounter;
use crate::inheritance::{annotate_inheritance, InheritanceEngine, InheritanceSummary};
use crate::loader::VariantLoader;
use crate::normalise::normalise_steps;
use crate::observer::{RunObserver, StreamProgress, TracingObserver};
use crate::policy::{run_gene_filter, FilterPolicy};
use crate::sources::{SampleSource, VariantSource};
use crate::steps::{AnalysisStep, VariantFilterStep};

// ── Gene universe ─────────────────────────────────────────────────────────────

/// Every gene a variant may belong to, in known-gene order.
struct GeneUniverse {
    genes: Vec<Gene>,
    by_symbol: IndexMap<String, usize>,
}

impl GeneUniverse {
    fn build(known: &[GeneIdentifier]) -> Self {
        let built: Vec<(String, Gene)> = known
            .par_iter()
            .map(|id| (id.symbol.clone(), Gene::from(id)))
            .collect();

        let mut genes = Vec::with_capacity(built.len());
        let mut by_symbol = IndexMap::with_capacity(built.len());
        for (symbol, gene) in built {
            if by_symbol.contains_key(&symbol) {
                continue;
            }
            by_symbol.insert(symbol, genes.len());
            genes.push(gene);
        }
        Self { genes, by_symbol }
    }

    fn gene(&self, symbol: &str) -> Option<&Gene> {
        self.by_symbol.get(symbol).map(|&i| &self.genes[i])
    }

    fn assign(&mut self, variants: Vec<VariantEvaluation>) {
        for variant in variants {
            if let Some(&i) = self.by_symbol.get(&variant.gene_symbol) {
                self.genes[i].add_variant(variant);
            }
        }
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

pub struct AnalysisRunner {
    sample_source: Arc<dyn SampleSource>,
    variant_source: Arc<dyn VariantSource>,
    inheritance_engine: Option<Arc<dyn InheritanceEngine>>,
    observer: Arc<dyn RunObserver>,
    parallel_gene_filters: bool,
}

impl AnalysisRunner {
    pub fn new(sample_source: Arc<dyn SampleSource>, variant_source: Arc<dyn VariantSource>) -> Self {
        Self {
            sample_source,
            variant_source,
            inheritance_engine: None,
            observer: Arc::new(TracingObserver),
            parallel_gene_filters: false,
        }
    }

    pub fn with_inheritance_engine(mut self, engine: Arc<dyn InheritanceEngine>) -> Self {
        self.inheritance_engine = Some(engine);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fan gene filters out over the rayon pool.
    pub fn with_parallel_gene_filters(mut self, parallel: bool) -> Self {
        self.parallel_gene_filters = parallel;
        self
    }

    /// Run `analysis` to completion and attach its results. The analysis
    /// keeps the normalised step list. On error nothing is attached.
    #[instrument(skip_all, fields(vcf = %analysis.vcf_path().display()))]
    pub fn run_analysis(&self, analysis: &mut Analysis) -> Result<()> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let t0 = Instant::now();
        let settings = analysis.settings().clone();
        info!(
            run_id = %run_id,
            retention = ?settings.run.retention_mode,
            scoring = ?settings.run.scoring_mode,
            "Starting analysis"
        );

        let sample = self.sample_source.sample_data(analysis.sample())?;
        let known = self.sample_source.known_genes()?;
        let mut universe = GeneUniverse::build(&known);
        info!(genes = universe.genes.len(), proband = %sample.proband_id, "Gene universe built");

        let normalised = normalise_steps(analysis.take_steps());
        for repair in &normalised.repairs {
            self.observer.on_repair(repair);
        }
        for notice in &normalised.notices {
            self.observer.on_notice(notice);
        }
        analysis.set_steps(normalised.steps);
        let groups = group_steps(analysis.steps());

        let mut run = RunContext {
            settings: &settings,
            sample: &sample,
            counter: FilterResultCounter::new(),
            stream: None,
            inheritance: None,
        };

        for (index, group) in groups.iter().enumerate() {
            self.observer.on_group_started(index, group);
            self.run_group(group, &mut run, analysis, &mut universe)?;
        }
        if run.stream.is_none() {
            self.load_variants(&[], &mut run, analysis, &mut universe)?;
        }

        let mut genes: Vec<Gene> = universe.genes.into_iter().filter(Gene::has_variants).collect();
        let modes = settings.requested_modes();
        scorer_for(settings.run.scoring_mode, ScoreWeights::from(&settings.scoring))
            .score_genes(&mut genes, &modes);

        if settings.run.retention_mode == RetentionMode::PassOnly {
            genes.retain(|g| g.passed_filters() && g.has_passed_variant());
            for gene in &mut genes {
                gene.retain_variants(VariantEvaluation::passed_filters);
            }
        }
        sort_by_score(&mut genes);

        if let Some(top) = genes.first() {
            debug!(
                gene = %top.symbol,
                score = ?top.combined_score(),
                position = ?top_variant(top).map(|v| v.position()),
                "Top ranked gene"
            );
        }

        let RunContext { counter, stream, inheritance, .. } = run;
        let variants: Vec<VariantEvaluation> =
            genes.iter().flat_map(|g| g.variants().iter().cloned()).collect();
        let results = AnalysisResults {
            run_id,
            started_at,
            duration_ms: t0.elapsed().as_millis() as u64,
            sample,
            genes,
            variants,
            filter_counts: counter.filter_result_counts(),
            stream: stream.unwrap_or_default(),
            inheritance,
        };

        info!(
            run_id = %run_id,
            genes = results.genes.len(),
            variants = results.variants.len(),
            streamed = results.stream.streamed,
            duration_ms = results.duration_ms,
            "Analysis complete"
        );
        analysis.set_results(results);
        Ok(())
    }

    fn run_group(
        &self,
        group: &StepGroup,
        run: &mut RunContext<'_>,
        analysis: &Analysis,
        universe: &mut GeneUniverse,
    ) -> Result<()> {
        if group.is_variant_filter_group() {
            let filters: Vec<VariantFilterStep> =
                group.steps.iter().filter_map(AnalysisStep::as_variant_filter).cloned().collect();
            if run.stream.is_none() {
                return self.load_variants(&filters, run, analysis, universe);
            }
            let policy = FilterPolicy::for_retention(run.settings.run.retention_mode);
            for gene in universe.genes.iter_mut() {
                for variant in gene.variants_mut() {
                    policy.apply_variant_filters(&filters, variant, &run.settings.sources, &run.counter);
                }
            }
            return Ok(());
        }

        if group.is_inheritance_mode_dependent() {
            if run.stream.is_none() {
                self.load_variants(&[], run, analysis, universe)?;
            }
            if run.inheritance.is_none() {
                let summary = self.annotate_inheritance(run, &mut universe.genes);
                run.inheritance = Some(summary);
            }
        }

        for step in &group.steps {
            self.run_gene_step(step, &mut universe.genes, &run.counter)?;
        }
        Ok(())
    }

    fn run_gene_step(
        &self,
        step: &AnalysisStep,
        genes: &mut [Gene],
        counter: &FilterResultCounter,
    ) -> Result<()> {
        if let AnalysisStep::Prioritizer(prioritizer) = step {
            info!(prioritizer = %prioritizer.priority_type(), genes = genes.len(), "Running prioritizer");
            prioritizer.prioritize(genes)?;
        } else if let Some(filter) = step.as_gene_filter() {
            run_gene_filter(filter, genes, counter, self.parallel_gene_filters);
        }
        Ok(())
    }

    fn load_variants(
        &self,
        filters: &[VariantFilterStep],
        run: &mut RunContext<'_>,
        analysis: &Analysis,
        universe: &mut GeneUniverse,
    ) -> Result<()> {
        let settings = run.settings;
        info!(path = %analysis.vcf_path().display(), filters = filters.len(), "Loading variants");
        let records = self.variant_source.open(analysis.vcf_path())?;
        let known: &GeneUniverse = universe;
        let loaded = VariantLoader::new(&settings.sources, &run.counter, self.observer.as_ref())
            .with_filters(filters)
            .with_retention(settings.run.retention_mode)
            .with_progress_interval(settings.run.progress_interval)
            .load(records, |symbol| known.gene(symbol))?;

        info!(
            streamed = loaded.tally.streamed,
            passed = loaded.tally.passed,
            kept = loaded.variants.len(),
            "Variants loaded"
        );
        universe.assign(loaded.variants);
        run.stream = Some(loaded.tally);
        Ok(())
    }

    fn annotate_inheritance(&self, run: &RunContext<'_>, genes: &mut [Gene]) -> InheritanceSummary {
        let modes = run.settings.requested_modes();
        if modes.is_empty() {
            return InheritanceSummary::default();
        }
        match &self.inheritance_engine {
            Some(engine) => annotate_inheritance(genes, &modes, &run.sample.pedigree, engine.as_ref()),
            None => {
                warn!(?modes, "Inheritance modes requested but no inheritance engine configured");
                InheritanceSummary::default()
            }
        }
    }
}

/// Mutable state of one run.
struct RunContext<'a> {
    settings: &'a AnalysisSettings,
    sample: &'a SampleData,
    counter: FilterResultCounter,
    /// Set once variants are loaded.
    stream: Option<StreamProgress>,
    inheritance: Option<InheritanceSummary>,
}
