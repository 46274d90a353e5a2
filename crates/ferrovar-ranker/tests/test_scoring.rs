//! Scorer behaviour over a small mixed gene set.

use ferrovar_common::{FilterResult, FilterType, Gene, PriorityResult, PriorityType, ScoringMode};
use ferrovar_ranker::{scorer_for, sort_by_score, ScoreWeights};
use ferrovar_test_utils::{gene_with_variants, snv};
use pretty_assertions::assert_eq;

fn genes() -> Vec<Gene> {
    let mut strong = gene_with_variants("STRONG", 1, vec![snv("STRONG", 1, 1).with_pathogenicity(0.95)]);
    strong.add_priority_result(PriorityResult::new(PriorityType::HiPhive, 0.9));

    let mut weak = gene_with_variants("WEAK", 2, vec![snv("WEAK", 2, 2).with_pathogenicity(0.3)]);
    weak.add_priority_result(PriorityResult::new(PriorityType::HiPhive, 0.2));

    let mut tied = gene_with_variants("TIED", 3, vec![snv("TIED", 3, 3).with_pathogenicity(0.3)]);
    tied.add_priority_result(PriorityResult::new(PriorityType::HiPhive, 0.2));

    let mut filtered = snv("FILTERED", 4, 4).with_pathogenicity(1.0);
    filtered.add_filter_result(FilterResult::fail(FilterType::Quality));
    let failed = gene_with_variants("FILTERED", 4, vec![filtered]);

    vec![weak, failed, strong, tied]
}

fn ranked(mode: ScoringMode) -> Vec<(String, Option<f64>)> {
    let mut genes = genes();
    scorer_for(mode, ScoreWeights::default()).score_genes(&mut genes, &[]);
    sort_by_score(&mut genes);
    genes
        .iter()
        .map(|g| (g.symbol.clone(), g.combined_score().map(|s| (s * 1000.0).round() / 1000.0)))
        .collect()
}

#[test]
fn test_raw_ranking() {
    assert_eq!(
        ranked(ScoringMode::RawScore),
        vec![
            ("STRONG".to_string(), Some(0.925)),
            ("TIED".to_string(), Some(0.25)),
            ("WEAK".to_string(), Some(0.25)),
            ("FILTERED".to_string(), None),
        ]
    );
}

#[test]
fn test_rank_based_ranking_shares_tied_ranks() {
    // Ranks 1, 2.5, 2.5 out of three eligible genes.
    assert_eq!(
        ranked(ScoringMode::RankBased),
        vec![
            ("STRONG".to_string(), Some(1.0)),
            ("TIED".to_string(), Some(0.5)),
            ("WEAK".to_string(), Some(0.5)),
            ("FILTERED".to_string(), None),
        ]
    );
}
