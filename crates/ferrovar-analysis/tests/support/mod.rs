//! In-memory collaborators for runner tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ferrovar_analysis::{
    CompatibilityError, FunctionalCategory, InheritanceEngine, Prioritizer, RunObserver, SampleDescriptor,
    SampleSource, StepGroup, StepRepair, StreamProgress, VariantDataService, VariantSource, VariantStream,
};
use ferrovar_common::settings::SourceConfig;
use ferrovar_common::{
    FerrovarError, FrequencyData, Gene, GeneIdentifier, GenomicVariant, ModeOfInheritance, Pedigree,
    PriorityResult, PriorityType, Result, SampleData, VariantEvaluation,
};
use parking_lot::Mutex;

// ── Sources ───────────────────────────────────────────────────────────────────

pub struct InMemoryVariantSource {
    variants: Vec<VariantEvaluation>,
    /// Yield a read error after this many records.
    fail_after: Option<usize>,
    opened: AtomicUsize,
}

impl InMemoryVariantSource {
    pub fn new(variants: Vec<VariantEvaluation>) -> Self {
        Self { variants, fail_after: None, opened: AtomicUsize::new(0) }
    }

    pub fn truncated(variants: Vec<VariantEvaluation>, after: usize) -> Self {
        Self { fail_after: Some(after), ..Self::new(variants) }
    }

    pub fn times_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl VariantSource for InMemoryVariantSource {
    fn open(&self, path: &Path) -> Result<VariantStream> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let mut records: Vec<Result<VariantEvaluation>> = self.variants.iter().cloned().map(Ok).collect();
        if let Some(after) = self.fail_after {
            records.truncate(after);
            records.push(Err(FerrovarError::VariantSource(format!(
                "{}: unexpected end of file",
                path.display()
            ))));
        }
        Ok(Box::new(records.into_iter()))
    }
}

pub struct StaticSampleSource {
    genes: Vec<GeneIdentifier>,
    sample: SampleData,
}

impl StaticSampleSource {
    pub fn new(genes: Vec<GeneIdentifier>, sample: SampleData) -> Self {
        Self { genes, sample }
    }
}

impl SampleSource for StaticSampleSource {
    fn known_genes(&self) -> Result<Vec<GeneIdentifier>> {
        Ok(self.genes.clone())
    }

    fn sample_data(&self, sample: &SampleDescriptor) -> Result<SampleData> {
        if sample.proband_id != self.sample.proband_id {
            return Err(FerrovarError::SampleSource(format!("unknown proband {}", sample.proband_id)));
        }
        Ok(self.sample.clone())
    }
}

// ── Steps and services ────────────────────────────────────────────────────────

/// Frequencies keyed by variant position.
pub struct FrequencyLookup {
    frequencies: HashMap<u32, f32>,
    lookups: AtomicUsize,
}

impl FrequencyLookup {
    pub fn new(entries: &[(u32, f32)]) -> Self {
        Self { frequencies: entries.iter().copied().collect(), lookups: AtomicUsize::new(0) }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl VariantDataService for FrequencyLookup {
    fn prefetch(&self, variant: &mut VariantEvaluation, _sources: &SourceConfig) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(&freq) = self.frequencies.get(&variant.position()) {
            variant.frequency_data = Some(FrequencyData { max_freq_percent: freq });
        }
    }
}

pub struct FixedPrioritizer {
    priority_type: PriorityType,
    scores: HashMap<String, f64>,
}

impl FixedPrioritizer {
    pub fn new(priority_type: PriorityType, scores: &[(&str, f64)]) -> Self {
        Self {
            priority_type,
            scores: scores.iter().map(|(s, v)| (s.to_string(), *v)).collect(),
        }
    }
}

impl Prioritizer for FixedPrioritizer {
    fn priority_type(&self) -> PriorityType {
        self.priority_type
    }

    fn prioritize(&self, genes: &mut [Gene]) -> Result<()> {
        for gene in genes {
            let score = self.scores.get(&gene.symbol).copied().unwrap_or(0.0);
            gene.add_priority_result(PriorityResult::new(self.priority_type, score));
        }
        Ok(())
    }
}

pub struct FailingPrioritizer;

impl Prioritizer for FailingPrioritizer {
    fn priority_type(&self) -> PriorityType {
        PriorityType::Phive
    }

    fn prioritize(&self, _genes: &mut [Gene]) -> Result<()> {
        Err(FerrovarError::Prioritizer("phenotype ontology not loaded".into()))
    }
}

/// Compatible positions per mode. Records every batch of variants it sees.
#[derive(Default)]
pub struct PositionInheritanceEngine {
    compatible: HashMap<ModeOfInheritance, BTreeSet<u32>>,
    pub seen: Mutex<Vec<(ModeOfInheritance, Vec<u32>)>>,
}

impl PositionInheritanceEngine {
    pub fn with(mut self, mode: ModeOfInheritance, positions: &[u32]) -> Self {
        self.compatible.entry(mode).or_default().extend(positions);
        self
    }
}

impl InheritanceEngine for PositionInheritanceEngine {
    fn compatible_variants(
        &self,
        _pedigree: &Pedigree,
        mode: ModeOfInheritance,
        variants: &[Arc<GenomicVariant>],
    ) -> std::result::Result<Vec<Arc<GenomicVariant>>, CompatibilityError> {
        self.seen.lock().push((mode, variants.iter().map(|v| v.position).collect()));
        let positions = self.compatible.get(&mode);
        Ok(variants
            .iter()
            .filter(|v| positions.is_some_and(|p| p.contains(&v.position)))
            .cloned()
            .collect())
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingObserver {
    pub repairs: Mutex<Vec<StepRepair>>,
    pub groups: Mutex<Vec<FunctionalCategory>>,
    pub progress: Mutex<Vec<StreamProgress>>,
    pub notices: Mutex<Vec<String>>,
}

impl RunObserver for RecordingObserver {
    fn on_progress(&self, progress: StreamProgress) {
        self.progress.lock().push(progress);
    }

    fn on_repair(&self, repair: &StepRepair) {
        self.repairs.lock().push(repair.clone());
    }

    fn on_notice(&self, notice: &str) {
        self.notices.lock().push(notice.to_string());
    }

    fn on_group_started(&self, _index: usize, group: &StepGroup) {
        self.groups.lock().push(group.category);
    }
}
