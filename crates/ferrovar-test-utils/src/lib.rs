//! Shared fixtures for Ferrovar tests: genes, variants, pedigrees and
//! tracing setup.

use std::sync::{Arc, Once};

use ferrovar_common::{
    FilterResult, FilterType, Gene, GeneIdentifier, GenomicVariant, Individual, Pedigree,
    SampleData, Sex, VariantEvaluation,
};

pub use pretty_assertions;

static TRACING: Once = Once::new();

/// Install a test subscriber once per process. Honours RUST_LOG.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Single-nucleotide variant on chromosome 1 assigned to `gene`.
pub fn snv(gene: &str, gene_id: u32, position: u32) -> VariantEvaluation {
    let record = Arc::new(GenomicVariant::new("1", position, "A", &["T"]));
    VariantEvaluation::new(record, 0, gene, gene_id)
}

/// All per-allele evaluations of one multi-allelic record.
pub fn multiallelic(gene: &str, gene_id: u32, position: u32, alternates: &[&str]) -> Vec<VariantEvaluation> {
    let record = Arc::new(GenomicVariant::new("1", position, "A", alternates));
    (0..alternates.len())
        .map(|i| VariantEvaluation::new(record.clone(), i, gene, gene_id))
        .collect()
}

/// Variant with an already recorded failure for `filter_type`.
pub fn failed(mut variant: VariantEvaluation, filter_type: FilterType) -> VariantEvaluation {
    variant.add_filter_result(FilterResult::fail(filter_type));
    variant
}

pub fn gene_with_variants(symbol: &str, entrez_id: u32, variants: Vec<VariantEvaluation>) -> Gene {
    let mut gene = Gene::new(symbol, entrez_id);
    for v in variants {
        gene.add_variant(v);
    }
    gene
}

pub fn known_genes(entries: &[(&str, u32)]) -> Vec<GeneIdentifier> {
    entries
        .iter()
        .map(|(symbol, id)| GeneIdentifier::new(symbol, *id))
        .collect()
}

/// Affected child of two unaffected parents.
pub fn trio_pedigree() -> Pedigree {
    Pedigree {
        individuals: vec![
            Individual {
                id: "proband".to_string(),
                father_id: Some("father".to_string()),
                mother_id: Some("mother".to_string()),
                sex: Sex::Female,
                affected: true,
            },
            Individual {
                id: "father".to_string(),
                father_id: None,
                mother_id: None,
                sex: Sex::Male,
                affected: false,
            },
            Individual {
                id: "mother".to_string(),
                father_id: None,
                mother_id: None,
                sex: Sex::Female,
                affected: false,
            },
        ],
    }
}

pub fn singleton_sample() -> SampleData {
    SampleData {
        proband_id: "proband".to_string(),
        sample_names: vec!["proband".to_string()],
        pedigree: Pedigree::single_affected("proband"),
    }
}

pub fn trio_sample() -> SampleData {
    SampleData {
        proband_id: "proband".to_string(),
        sample_names: vec!["proband".to_string(), "father".to_string(), "mother".to_string()],
        pedigree: trio_pedigree(),
    }
}
