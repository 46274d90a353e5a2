//! ferrovar-analysis — Analysis step orchestration: step ordering, batching,
//! streamed variant filtering, inheritance annotation and gene ranking.

pub mod analysis;
pub mod batching;
pub mod counter;
pub mod filters;
pub mod inheritance;
pub mod loader;
pub mod normalise;
pub mod observer;
pub mod policy;
pub mod runner;
pub mod sources;
pub mod steps;

#[cfg(test)]
mod test_support;

pub use analysis::{Analysis, AnalysisResults};
pub use batching::{group_steps, StepGroup};
pub use counter::{FilterResultCount, FilterResultCounter};
pub use filters::{FrequencyFilter, GeneSymbolFilter, PathogenicityFilter, QualityFilter};
pub use inheritance::{annotate_inheritance, CompatibilityError, InheritanceEngine, InheritanceSummary};
pub use loader::{LoadedVariants, VariantLoader};
pub use normalise::{normalise_steps, NormalisedSteps, StepRepair};
pub use observer::{RunObserver, StreamProgress, TracingObserver};
pub use policy::{run_gene_filter, FilterPolicy};
pub use runner::AnalysisRunner;
pub use sources::{SampleDescriptor, SampleSource, VariantSource, VariantStream};
pub use steps::{
    AnalysisStep, FunctionalCategory, GeneFilter, InheritanceFilter, PriorityScoreFilter, Prioritizer,
    VariantDataService, VariantFilter, VariantFilterStep,
};
