//! Genes, their prioritizer results and their final scores.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::filter::{FilterResult, FilterStatus, FilterType};
use crate::inheritance::ModeOfInheritance;
use crate::variant::VariantEvaluation;

// ---------------------------------------------------------------------------
// Gene identifier
// ---------------------------------------------------------------------------

/// Entry in the known-gene dictionary supplied by the sample source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneIdentifier {
    pub symbol: String,
    pub entrez_id: u32,
}

impl GeneIdentifier {
    pub fn new(symbol: &str, entrez_id: u32) -> Self {
        Self { symbol: symbol.to_string(), entrez_id }
    }
}

// ---------------------------------------------------------------------------
// Prioritizer results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityType {
    HiPhive,
    Phive,
    Phenix,
    ExomeWalker,
    Omim,
}

impl PriorityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityType::HiPhive     => "hiphive",
            PriorityType::Phive       => "phive",
            PriorityType::Phenix      => "phenix",
            PriorityType::ExomeWalker => "exome_walker",
            PriorityType::Omim        => "omim",
        }
    }
}

impl std::fmt::Display for PriorityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub priority_type: PriorityType,
    /// 0.0–1.0, higher is a better phenotype match.
    pub score: f64,
}

impl PriorityResult {
    pub fn new(priority_type: PriorityType, score: f64) -> Self {
        Self { priority_type, score }
    }
}

// ---------------------------------------------------------------------------
// Gene score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneScore {
    pub mode: ModeOfInheritance,
    pub variant_score: f64,
    pub priority_score: f64,
    pub combined_score: f64,
}

// ---------------------------------------------------------------------------
// Gene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Gene {
    pub symbol: String,
    pub entrez_id: u32,
    variants: Vec<VariantEvaluation>,
    filter_results: BTreeMap<FilterType, bool>,
    priority_results: BTreeMap<PriorityType, PriorityResult>,
    compatible_modes: BTreeSet<ModeOfInheritance>,
    score: Option<GeneScore>,
}

impl Gene {
    pub fn new(symbol: &str, entrez_id: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            entrez_id,
            variants: Vec::new(),
            filter_results: BTreeMap::new(),
            priority_results: BTreeMap::new(),
            compatible_modes: BTreeSet::new(),
            score: None,
        }
    }

    // ── Variants ────────────────────────────────────────────────────────────

    /// Gene-level filter results already on the gene are copied onto the
    /// variant, so a gene that failed before its variants arrived shows the
    /// failure on each of them too.
    pub fn add_variant(&mut self, mut variant: VariantEvaluation) {
        for result in self.filter_results() {
            variant.add_filter_result(result);
        }
        self.variants.push(variant);
    }

    /// Gene-level filter outcomes recorded so far.
    pub fn filter_results(&self) -> impl Iterator<Item = FilterResult> + '_ {
        self.filter_results
            .iter()
            .map(|(filter_type, passed)| FilterResult::of(*filter_type, *passed))
    }

    pub fn variants(&self) -> &[VariantEvaluation] {
        &self.variants
    }

    pub fn variants_mut(&mut self) -> &mut [VariantEvaluation] {
        &mut self.variants
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn passed_variants(&self) -> impl Iterator<Item = &VariantEvaluation> {
        self.variants.iter().filter(|v| v.passed_filters())
    }

    pub fn has_passed_variant(&self) -> bool {
        self.variants.iter().any(VariantEvaluation::passed_filters)
    }

    /// Keep only the variants matching `keep`. Used when building pass-only results.
    pub fn retain_variants<F>(&mut self, keep: F)
    where
        F: FnMut(&VariantEvaluation) -> bool,
    {
        self.variants.retain(keep);
    }

    // ── Gene-level filter results ───────────────────────────────────────────

    /// Returns `false` if this filter type already has an outcome on the gene.
    pub fn add_filter_result(&mut self, result: FilterResult) -> bool {
        if self.filter_results.contains_key(&result.filter_type) {
            return false;
        }
        self.filter_results.insert(result.filter_type, result.passed);
        true
    }

    /// True iff every gene-level filter result is a pass.
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

    // ── Prioritizer results ─────────────────────────────────────────────────

    pub fn add_priority_result(&mut self, result: PriorityResult) {
        self.priority_results.insert(result.priority_type, result);
    }

    pub fn priority_result(&self, priority_type: PriorityType) -> Option<&PriorityResult> {
        self.priority_results.get(&priority_type)
    }

    pub fn priority_results(&self) -> impl Iterator<Item = &PriorityResult> {
        self.priority_results.values()
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

    // ── Score ───────────────────────────────────────────────────────────────

    pub fn set_score(&mut self, score: GeneScore) {
        self.score = Some(score);
    }

    pub fn score(&self) -> Option<&GeneScore> {
        self.score.as_ref()
    }

    pub fn combined_score(&self) -> Option<f64> {
        self.score.map(|s| s.combined_score)
    }
}

impl From<&GeneIdentifier> for Gene {
    fn from(id: &GeneIdentifier) -> Self {
        Gene::new(&id.symbol, id.entrez_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::GenomicVariant;
    use std::sync::Arc;

    fn variant(pos: u32) -> VariantEvaluation {
        let record = Arc::new(GenomicVariant::new("10", pos, "G", &["A"]));
        VariantEvaluation::new(record, 0, "FGFR2", 2263)
    }

    #[test]
    fn test_gene_passes_without_filter_results() {
        let gene = Gene::new("FGFR2", 2263);
        assert!(gene.passed_filters());
        assert!(!gene.has_variants());
        assert!(!gene.has_passed_variant());
    }

    #[test]
    fn test_gene_fails_on_any_failed_result() {
        let mut gene = Gene::new("FGFR2", 2263);
        gene.add_filter_result(FilterResult::pass(FilterType::PriorityScore));
        gene.add_filter_result(FilterResult::fail(FilterType::Inheritance));
        assert!(!gene.passed_filters());
        assert_eq!(gene.filter_status(FilterType::PriorityScore), FilterStatus::Pass);
        assert_eq!(gene.filter_status(FilterType::GeneSymbol), FilterStatus::NotRun);
    }

    #[test]
    fn test_passed_variants() {
        let mut gene = Gene::new("FGFR2", 2263);
        let mut failing = variant(1);
        failing.add_filter_result(FilterResult::fail(FilterType::Frequency));
        gene.add_variant(failing);
        gene.add_variant(variant(2));
        assert_eq!(gene.passed_variants().count(), 1);
        assert!(gene.has_passed_variant());
    }

    #[test]
    fn test_late_variants_inherit_gene_results() {
        let mut gene = Gene::new("FGFR2", 2263);
        gene.add_filter_result(FilterResult::fail(FilterType::GeneSymbol));
        gene.add_variant(variant(1));
        assert_eq!(gene.variants()[0].filter_status(FilterType::GeneSymbol), FilterStatus::Fail);
        assert!(!gene.has_passed_variant());
    }
}
