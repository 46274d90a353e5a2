//! Filter identities and outcomes recorded on genes and variants.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Filter type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    FailedVariant,
    Quality,
    Interval,
    VariantEffect,
    KnownVariant,
    Frequency,
    Pathogenicity,
    GeneSymbol,
    PriorityScore,
    Inheritance,
}

impl FilterType {
    /// Short name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::FailedVariant  => "failed_variant",
            FilterType::Quality        => "quality",
            FilterType::Interval       => "interval",
            FilterType::VariantEffect  => "variant_effect",
            FilterType::KnownVariant   => "known_variant",
            FilterType::Frequency      => "frequency",
            FilterType::Pathogenicity  => "pathogenicity",
            FilterType::GeneSymbol     => "gene_symbol",
            FilterType::PriorityScore  => "priority_score",
            FilterType::Inheritance    => "inheritance",
        }
    }
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Filter status / result
// ---------------------------------------------------------------------------

/// Outcome of a filter for one record. `NotRun` is never stored, it is what
/// a query returns for a filter type that has no recorded outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStatus {
    Pass,
    Fail,
    NotRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    pub filter_type: FilterType,
    pub passed: bool,
}

impl FilterResult {
    pub fn pass(filter_type: FilterType) -> Self {
        Self { filter_type, passed: true }
    }

    pub fn fail(filter_type: FilterType) -> Self {
        Self { filter_type, passed: false }
    }

    pub fn of(filter_type: FilterType, passed: bool) -> Self {
        Self { filter_type, passed }
    }

    pub fn status(&self) -> FilterStatus {
        if self.passed { FilterStatus::Pass } else { FilterStatus::Fail }
    }
}
