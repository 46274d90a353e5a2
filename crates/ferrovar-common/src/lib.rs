//! ferrovar-common — Shared domain model, errors and settings used across all Ferrovar crates.

pub mod error;
pub mod filter;
pub mod gene;
pub mod inheritance;
pub mod pedigree;
pub mod settings;
pub mod variant;

// Re-export commonly used types
pub use error::{FerrovarError, Result};
pub use filter::{FilterResult, FilterStatus, FilterType};
pub use gene::{Gene, GeneIdentifier, GeneScore, PriorityResult, PriorityType};
pub use inheritance::ModeOfInheritance;
pub use pedigree::{Individual, Pedigree, SampleData, Sex};
pub use settings::{
    AnalysisSettings, FrequencySource, PathogenicitySource, RetentionMode, ScoringConfig, ScoringMode,
};
pub use variant::{FrequencyData, GenomicVariant, PathogenicityData, VariantEvaluation};
