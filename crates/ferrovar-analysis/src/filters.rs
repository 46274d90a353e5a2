//! Built-in filters.
//!
//! Variant filters read annotation already present on the variant (put there
//! by the variant source or by a data provider decorating the filter).
//! Gene filters read prioritizer results and inheritance annotations.

use std::collections::BTreeSet;

use ferrovar_common::{FilterResult, FilterType, Gene, VariantEvaluation};

use crate::steps::{GeneFilter, InheritanceFilter, PriorityScoreFilter, VariantFilter};

// ── Variant filters ───────────────────────────────────────────────────────────

/// Fails variants more common than `max_freq_percent` in any population.
/// Variants without frequency data are treated as novel and pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyFilter {
    pub max_freq_percent: f32,
}

impl FrequencyFilter {
    pub fn new(max_freq_percent: f32) -> Self {
        Self { max_freq_percent }
    }
}

impl VariantFilter for FrequencyFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Frequency
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> FilterResult {
        let passed = variant
            .frequency_data
            .map_or(true, |f| f.max_freq_percent <= self.max_freq_percent);
        FilterResult::of(FilterType::Frequency, passed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathogenicityFilter {
    pub min_score: f32,
    /// Always pass variants reported pathogenic in a clinical database.
    pub keep_known_pathogenic: bool,
}

impl PathogenicityFilter {
    pub fn new(min_score: f32) -> Self {
        Self { min_score, keep_known_pathogenic: true }
    }
}

impl VariantFilter for PathogenicityFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Pathogenicity
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> FilterResult {
        let passed = match variant.pathogenicity_data {
            Some(p) if p.known_pathogenic && self.keep_known_pathogenic => true,
            Some(p) => p.score >= self.min_score,
            None => self.min_score <= 0.0,
        };
        FilterResult::of(FilterType::Pathogenicity, passed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityFilter {
    pub min_quality: f64,
}

impl QualityFilter {
    pub fn new(min_quality: f64) -> Self {
        Self { min_quality }
    }
}

impl VariantFilter for QualityFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Quality
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> FilterResult {
        FilterResult::of(FilterType::Quality, variant.quality >= self.min_quality)
    }
}

// ── Gene filters ──────────────────────────────────────────────────────────────

/// Keeps only genes whose symbol is listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneSymbolFilter {
    pub symbols: BTreeSet<String>,
}

impl GeneSymbolFilter {
    pub fn new<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Self {
        Self { symbols: symbols.into_iter().map(str::to_string).collect() }
    }
}

impl GeneFilter for GeneSymbolFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::GeneSymbol
    }

    fn run_filter(&self, gene: &Gene) -> FilterResult {
        FilterResult::of(FilterType::GeneSymbol, self.symbols.contains(&gene.symbol))
    }
}

impl GeneFilter for PriorityScoreFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::PriorityScore
    }

    /// A gene the prioritizer never scored fails.
    fn run_filter(&self, gene: &Gene) -> FilterResult {
        let passed = gene
            .priority_result(self.priority_type)
            .is_some_and(|r| r.score >= self.min_score);
        FilterResult::of(FilterType::PriorityScore, passed)
    }
}

impl GeneFilter for InheritanceFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Inheritance
    }

    fn run_filter(&self, gene: &Gene) -> FilterResult {
        if self.is_unrestricted() {
            return FilterResult::pass(FilterType::Inheritance);
        }
        let passed = self
            .modes
            .iter()
            .filter(|m| !m.is_any())
            .any(|m| gene.compatible_modes().contains(m));
        FilterResult::of(FilterType::Inheritance, passed)
    }
}
