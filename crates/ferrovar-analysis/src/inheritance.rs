//! Inheritance-mode compatibility annotation.
//!
//! The segregation analysis itself is done by an external engine. This module
//! decides which genes and variants it sees and writes its answers back.

use std::collections::HashSet;
use std::sync::Arc;

use ferrovar_common::{Gene, GenomicVariant, ModeOfInheritance, Pedigree};
use indexmap::IndexSet;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityError {
    #[error("Inconsistent pedigree: {0}")]
    Pedigree(String),

    #[error("Genotype missing for sample {0}")]
    MissingGenotype(String),

    #[error("{0}")]
    Other(String),
}

/// Given a pedigree, a mode and one gene's variants, return the variants
/// whose segregation fits the mode.
pub trait InheritanceEngine: Send + Sync {
    fn compatible_variants(
        &self,
        pedigree: &Pedigree,
        mode: ModeOfInheritance,
        variants: &[Arc<GenomicVariant>],
    ) -> std::result::Result<Vec<Arc<GenomicVariant>>, CompatibilityError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InheritanceSummary {
    pub genes_checked: usize,
    pub genes_compatible: usize,
    pub engine_failures: usize,
}

/// Annotate every gene that has passed filtering so far with the modes its
/// passing variants are compatible with. Engine failures are logged and
/// leave that gene unannotated for the failing mode.
pub fn annotate_inheritance(
    genes: &mut [Gene],
    modes: &[ModeOfInheritance],
    pedigree: &Pedigree,
    engine: &dyn InheritanceEngine,
) -> InheritanceSummary {
    let modes: Vec<ModeOfInheritance> = modes.iter().copied().filter(|m| !m.is_any()).collect();
    let mut summary = InheritanceSummary::default();
    if modes.is_empty() {
        debug!("No inheritance mode requested, skipping compatibility check");
        return summary;
    }

    for gene in genes.iter_mut().filter(|g| g.passed_filters() && g.has_passed_variant()) {
        summary.genes_checked += 1;

        // Several allele evaluations can share one record.
        let records: IndexSet<Arc<GenomicVariant>> =
            gene.passed_variants().map(|v| v.record().clone()).collect();
        let records: Vec<Arc<GenomicVariant>> = records.into_iter().collect();

        for &mode in &modes {
            match engine.compatible_variants(pedigree, mode, &records) {
                Ok(compatible) if compatible.is_empty() => {}
                Ok(compatible) => {
                    let compatible: HashSet<&GenomicVariant> =
                        compatible.iter().map(Arc::as_ref).collect();
                    gene.add_compatible_mode(mode);
                    for variant in gene.variants_mut() {
                        if variant.passed_filters() && compatible.contains(&**variant.record()) {
                            variant.add_compatible_mode(mode);
                        }
                    }
                }
                Err(e) => {
                    summary.engine_failures += 1;
                    warn!(gene = %gene.symbol, %mode, error = %e, "Inheritance compatibility check failed");
                }
            }
        }

        if !gene.compatible_modes().is_empty() {
            summary.genes_compatible += 1;
        }
    }

    debug!(
        checked = summary.genes_checked,
        compatible = summary.genes_compatible,
        failures = summary.engine_failures,
        "Inheritance modes annotated"
    );
    summary
}
