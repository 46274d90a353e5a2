//! Genomic variant records and their per-allele evaluations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::{FilterResult, FilterStatus, FilterType};
use crate::inheritance::ModeOfInheritance;

// ---------------------------------------------------------------------------
// Genomic variant (one source record)
// ---------------------------------------------------------------------------

/// One record from the variant source. A multi-allelic record produces one
/// `VariantEvaluation` per alternate allele, all sharing this record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomicVariant {
    pub chromosome: String,
    pub position: u32,
    pub reference: String,
    pub alternates: Vec<String>,
}

impl GenomicVariant {
    pub fn new(chromosome: &str, position: u32, reference: &str, alternates: &[&str]) -> Self {
        Self {
            chromosome: chromosome.to_string(),
            position,
            reference: reference.to_string(),
            alternates: alternates.iter().map(|a| a.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotation payloads supplied by external data services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrequencyData {
    /// Highest allele frequency across the configured populations, in percent.
    pub max_freq_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathogenicityData {
    /// Best predicted pathogenicity across the configured sources, 0.0–1.0.
    pub score: f32,
    /// Reported pathogenic in a curated clinical database.
    pub known_pathogenic: bool,
}

// ---------------------------------------------------------------------------
// Variant evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct VariantEvaluation {
    record: Arc<GenomicVariant>,
    pub alt_allele_id: usize,
    pub gene_symbol: String,
    pub gene_id: u32,
    pub quality: f64,
    pub frequency_data: Option<FrequencyData>,
    pub pathogenicity_data: Option<PathogenicityData>,
    filter_results: BTreeMap<FilterType, bool>,
    compatible_modes: BTreeSet<ModeOfInheritance>,
}

impl VariantEvaluation {
    pub fn new(record: Arc<GenomicVariant>, alt_allele_id: usize, gene_symbol: &str, gene_id: u32) -> Self {
        Self {
            record,
            alt_allele_id,
            gene_symbol: gene_symbol.to_string(),
            gene_id,
            quality: 0.0,
            frequency_data: None,
            pathogenicity_data: None,
            filter_results: BTreeMap::new(),
            compatible_modes: BTreeSet::new(),
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_frequency(mut self, max_freq_percent: f32) -> Self {
        self.frequency_data = Some(FrequencyData { max_freq_percent });
        self
    }

    pub fn with_pathogenicity(mut self, score: f32) -> Self {
        self.pathogenicity_data = Some(PathogenicityData { score, known_pathogenic: false });
        self
    }

    pub fn record(&self) -> &Arc<GenomicVariant> {
        &self.record
    }

    pub fn chromosome(&self) -> &str {
        &self.record.chromosome
    }

    pub fn position(&self) -> u32 {
        self.record.position
    }

    pub fn reference(&self) -> &str {
        &self.record.reference
    }

    pub fn alternate(&self) -> &str {
        self.record
            .alternates
            .get(self.alt_allele_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    // ── Filter results ───────────────────────────────────────────────────────

    /// Record a filter outcome. Returns `false` and leaves the record untouched
    /// when an outcome for this filter type already exists.
    pub fn add_filter_result(&mut self, result: FilterResult) -> bool {
        if self.filter_results.contains_key(&result.filter_type) {
            return false;
        }
        self.filter_results.insert(result.filter_type, result.passed);
        true
    }

    /// True when no recorded outcome is a fail.
    pub fn passed_filters(&self) -> bool {
        self.filter_results.values().all(|passed| *passed)
    }

    pub fn filter_status(&self, filter_type: FilterType) -> FilterStatus {
        match self.filter_results.get(&filter_type) {
            Some(true) => FilterStatus::Pass,
            Some(false) => FilterStatus::Fail,
            None => FilterStatus::NotRun,
        }
    }

    pub fn passed_filter(&self, filter_type: FilterType) -> bool {
        self.filter_status(filter_type) == FilterStatus::Pass
    }

    pub fn failed_filter(&self, filter_type: FilterType) -> bool {
        self.filter_status(filter_type) == FilterStatus::Fail
    }

    /// Every listed filter has an explicit pass. Unevaluated filters count as not passed.
    pub fn passed_all(&self, filter_types: &[FilterType]) -> bool {
        filter_types.iter().all(|ft| self.passed_filter(*ft))
    }

    pub fn passed_filter_types(&self) -> Vec<FilterType> {
        self.filter_results
            .iter()
            .filter(|(_, passed)| **passed)
            .map(|(ft, _)| *ft)
            .collect()
    }

    pub fn failed_filter_types(&self) -> Vec<FilterType> {
        self.filter_results
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(ft, _)| *ft)
            .collect()
    }

    // ── Inheritance ─────────────────────────────────────────────────────────

    pub fn add_compatible_mode(&mut self, mode: ModeOfInheritance) {
        self.compatible_modes.insert(mode);
    }

    pub fn compatible_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.compatible_modes
    }

    pub fn is_compatible_with(&self, mode: ModeOfInheritance) -> bool {
        mode.is_any() || self.compatible_modes.contains(&mode)
    }
}
