//! The analysis definition and its results.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ferrovar_common::{
    AnalysisSettings, Gene, ModeOfInheritance, RetentionMode, SampleData, ScoringMode, VariantEvaluation,
};
use serde::Serialize;
use uuid::Uuid;

use crate::counter::FilterResultCount;
use crate::inheritance::InheritanceSummary;
use crate::observer::StreamProgress;
use crate::sources::SampleDescriptor;
use crate::steps::AnalysisStep;

/// What to run on which sample. Built by the caller, then handed to
/// `AnalysisRunner::run_analysis`, which stores the normalised step list and
/// attaches results.
#[derive(Debug, Clone)]
pub struct Analysis {
    vcf_path: PathBuf,
    sample: SampleDescriptor,
    settings: AnalysisSettings,
    steps: Vec<AnalysisStep>,
    results: Option<AnalysisResults>,
}

impl Analysis {
    pub fn new(vcf_path: impl Into<PathBuf>) -> Self {
        Self {
            vcf_path: vcf_path.into(),
            sample: SampleDescriptor::default(),
            settings: AnalysisSettings::default(),
            steps: Vec::new(),
            results: None,
        }
    }

    pub fn with_sample(mut self, sample: SampleDescriptor) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn add_step(mut self, step: AnalysisStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_steps(mut self, steps: impl IntoIterator<Item = AnalysisStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn with_retention_mode(mut self, mode: RetentionMode) -> Self {
        self.settings.run.retention_mode = mode;
        self
    }

    pub fn with_scoring_mode(mut self, mode: ScoringMode) -> Self {
        self.settings.run.scoring_mode = mode;
        self
    }

    pub fn with_inheritance_modes(mut self, modes: impl IntoIterator<Item = ModeOfInheritance>) -> Self {
        self.settings.run.inheritance_modes = modes.into_iter().collect::<BTreeSet<_>>();
        self
    }

    pub fn vcf_path(&self) -> &Path {
        &self.vcf_path
    }

    pub fn sample(&self) -> &SampleDescriptor {
        &self.sample
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn retention_mode(&self) -> RetentionMode {
        self.settings.run.retention_mode
    }

    /// After a run, the normalised order that was executed.
    pub fn steps(&self) -> &[AnalysisStep] {
        &self.steps
    }

    pub fn results(&self) -> Option<&AnalysisResults> {
        self.results.as_ref()
    }

    pub(crate) fn take_steps(&mut self) -> Vec<AnalysisStep> {
        std::mem::take(&mut self.steps)
    }

    pub(crate) fn set_steps(&mut self, steps: Vec<AnalysisStep>) {
        self.steps = steps;
    }

    pub(crate) fn set_results(&mut self, results: AnalysisResults) {
        self.results = Some(results);
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResults {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub sample: SampleData,
    /// Best first. Unscored genes last.
    pub genes: Vec<Gene>,
    /// Variants of `genes`, in gene order.
    pub variants: Vec<VariantEvaluation>,
    pub filter_counts: Vec<FilterResultCount>,
    pub stream: StreamProgress,
    pub inheritance: Option<InheritanceSummary>,
}

impl AnalysisResults {
    pub fn gene(&self, symbol: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.symbol == symbol)
    }

    pub fn to_json(&self) -> ferrovar_common::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
