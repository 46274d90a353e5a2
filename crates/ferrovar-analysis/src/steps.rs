//! Analysis steps.
//!
//! An analysis is an ordered list of steps. Each step is one of five kinds,
//! and its functional category (which decides how it is batched and when it
//! may run) is derived from the kind rather than stored.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use ferrovar_common::settings::SourceConfig;
use ferrovar_common::{
    FilterResult, FilterType, Gene, ModeOfInheritance, PriorityType, Result, VariantEvaluation,
};

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Filter evaluated against a single variant.
pub trait VariantFilter: Send + Sync {
    fn filter_type(&self) -> FilterType;
    fn run_filter(&self, variant: &VariantEvaluation) -> FilterResult;
}

/// Filter evaluated against a whole gene.
pub trait GeneFilter: Send + Sync {
    fn filter_type(&self) -> FilterType;
    fn run_filter(&self, gene: &Gene) -> FilterResult;
}

/// Attaches phenotype-match scores to genes. The scoring itself is external.
pub trait Prioritizer: Send + Sync {
    fn priority_type(&self) -> PriorityType;
    fn prioritize(&self, genes: &mut [Gene]) -> Result<()>;
}

/// Looks up population frequency or pathogenicity data for a variant on
/// demand, before a data-dependent filter looks at it.
pub trait VariantDataService: Send + Sync {
    fn prefetch(&self, variant: &mut VariantEvaluation, sources: &SourceConfig);
}

// ── Variant filter step ───────────────────────────────────────────────────────

/// A variant filter plus an optional data lookup run just before it.
#[derive(Clone)]
pub struct VariantFilterStep {
    filter: Arc<dyn VariantFilter>,
    data_provider: Option<Arc<dyn VariantDataService>>,
}

impl VariantFilterStep {
    pub fn new(filter: Arc<dyn VariantFilter>) -> Self {
        Self { filter, data_provider: None }
    }

    pub fn with_data_provider(filter: Arc<dyn VariantFilter>, provider: Arc<dyn VariantDataService>) -> Self {
        Self { filter, data_provider: Some(provider) }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    pub fn has_data_provider(&self) -> bool {
        self.data_provider.is_some()
    }

    /// Fetch data if decorated, then run the wrapped filter.
    pub fn apply(&self, variant: &mut VariantEvaluation, sources: &SourceConfig) -> FilterResult {
        if let Some(provider) = &self.data_provider {
            provider.prefetch(variant, sources);
        }
        self.filter.run_filter(variant)
    }
}

impl PartialEq for VariantFilterStep {
    fn eq(&self, other: &Self) -> bool {
        let same_provider = match (&self.data_provider, &other.data_provider) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        Arc::ptr_eq(&self.filter, &other.filter) && same_provider
    }
}

// ── Gene-level filters owned by the core ──────────────────────────────────────

/// Fails genes whose score from one prioritizer is below a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityScoreFilter {
    pub priority_type: PriorityType,
    pub min_score: f64,
}

impl PriorityScoreFilter {
    pub fn new(priority_type: PriorityType, min_score: f64) -> Self {
        Self { priority_type, min_score }
    }
}

/// Fails genes that are not compatible with any of the configured modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceFilter {
    pub modes: BTreeSet<ModeOfInheritance>,
}

impl InheritanceFilter {
    pub fn new(modes: impl IntoIterator<Item = ModeOfInheritance>) -> Self {
        Self { modes: modes.into_iter().collect() }
    }

    /// Only the `Any` sentinel (or nothing) was requested.
    pub fn is_unrestricted(&self) -> bool {
        self.modes.iter().all(ModeOfInheritance::is_any)
    }
}

// ── Step ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalCategory {
    VariantFilter,
    GeneOnlyDependent,
    InheritanceModeDependent,
}

#[derive(Clone)]
pub enum AnalysisStep {
    VariantFilter(VariantFilterStep),
    GeneFilter(Arc<dyn GeneFilter>),
    Prioritizer(Arc<dyn Prioritizer>),
    PriorityScoreFilter(PriorityScoreFilter),
    InheritanceFilter(InheritanceFilter),
}

impl AnalysisStep {
    pub fn variant_filter(filter: impl VariantFilter + 'static) -> Self {
        AnalysisStep::VariantFilter(VariantFilterStep::new(Arc::new(filter)))
    }

    pub fn decorated_variant_filter(
        filter: impl VariantFilter + 'static,
        provider: Arc<dyn VariantDataService>,
    ) -> Self {
        AnalysisStep::VariantFilter(VariantFilterStep::with_data_provider(Arc::new(filter), provider))
    }

    pub fn gene_filter(filter: impl GeneFilter + 'static) -> Self {
        AnalysisStep::GeneFilter(Arc::new(filter))
    }

    pub fn prioritizer(prioritizer: impl Prioritizer + 'static) -> Self {
        AnalysisStep::Prioritizer(Arc::new(prioritizer))
    }

    pub fn priority_score_filter(priority_type: PriorityType, min_score: f64) -> Self {
        AnalysisStep::PriorityScoreFilter(PriorityScoreFilter::new(priority_type, min_score))
    }

    pub fn inheritance_filter(modes: impl IntoIterator<Item = ModeOfInheritance>) -> Self {
        AnalysisStep::InheritanceFilter(InheritanceFilter::new(modes))
    }

    pub fn is_variant_filter(&self) -> bool {
        matches!(self, AnalysisStep::VariantFilter(_))
    }

    pub fn as_variant_filter(&self) -> Option<&VariantFilterStep> {
        match self {
            AnalysisStep::VariantFilter(filter) => Some(filter),
            _ => None,
        }
    }

    /// The gene-level filter this step applies, if it is one.
    pub fn as_gene_filter(&self) -> Option<&dyn GeneFilter> {
        match self {
            AnalysisStep::GeneFilter(filter) => Some(filter.as_ref()),
            AnalysisStep::PriorityScoreFilter(filter) => Some(filter),
            AnalysisStep::InheritanceFilter(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn is_inheritance_mode_dependent(&self) -> bool {
        match self {
            AnalysisStep::InheritanceFilter(_) => true,
            AnalysisStep::Prioritizer(p) => p.priority_type() == PriorityType::Omim,
            _ => false,
        }
    }

    /// Needs only gene-level data, no variants.
    pub fn is_only_gene_dependent(&self) -> bool {
        match self {
            AnalysisStep::GeneFilter(_) | AnalysisStep::PriorityScoreFilter(_) => true,
            AnalysisStep::Prioritizer(_) => !self.is_inheritance_mode_dependent(),
            _ => false,
        }
    }

    pub fn category(&self) -> FunctionalCategory {
        if self.is_inheritance_mode_dependent() {
            FunctionalCategory::InheritanceModeDependent
        } else if self.is_only_gene_dependent() {
            FunctionalCategory::GeneOnlyDependent
        } else {
            FunctionalCategory::VariantFilter
        }
    }

    /// Prioritizer type this step produces (prioritizers) or consumes
    /// (priority score filters).
    pub fn priority_type(&self) -> Option<PriorityType> {
        match self {
            AnalysisStep::Prioritizer(p) => Some(p.priority_type()),
            AnalysisStep::PriorityScoreFilter(f) => Some(f.priority_type),
            _ => None,
        }
    }

    pub fn is_prioritizer_of(&self, priority_type: PriorityType) -> bool {
        matches!(self, AnalysisStep::Prioritizer(p) if p.priority_type() == priority_type)
    }

    pub fn is_priority_score_filter_for(&self, priority_type: PriorityType) -> bool {
        matches!(self, AnalysisStep::PriorityScoreFilter(f) if f.priority_type == priority_type)
    }
}

impl PartialEq for AnalysisStep {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnalysisStep::VariantFilter(a), AnalysisStep::VariantFilter(b)) => a == b,
            (AnalysisStep::GeneFilter(a), AnalysisStep::GeneFilter(b)) => Arc::ptr_eq(a, b),
            (AnalysisStep::Prioritizer(a), AnalysisStep::Prioritizer(b)) => Arc::ptr_eq(a, b),
            (AnalysisStep::PriorityScoreFilter(a), AnalysisStep::PriorityScoreFilter(b)) => a == b,
            (AnalysisStep::InheritanceFilter(a), AnalysisStep::InheritanceFilter(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for AnalysisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStep::VariantFilter(s) if s.has_data_provider() => {
                write!(f, "VariantFilter({}+data)", s.filter_type())
            }
            AnalysisStep::VariantFilter(s) => write!(f, "VariantFilter({})", s.filter_type()),
            AnalysisStep::GeneFilter(g) => write!(f, "GeneFilter({})", g.filter_type()),
            AnalysisStep::Prioritizer(p) => write!(f, "Prioritizer({})", p.priority_type()),
            AnalysisStep::PriorityScoreFilter(p) => {
                write!(f, "PriorityScoreFilter({} >= {})", p.priority_type, p.min_score)
            }
            AnalysisStep::InheritanceFilter(i) => {
                let modes: Vec<&str> = i.modes.iter().map(|m| m.as_str()).collect();
                write!(f, "InheritanceFilter({})", modes.join(","))
            }
        }
    }
}
