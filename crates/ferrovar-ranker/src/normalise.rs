//! Score normalisation functions.
//! Rank-based percentiles for the rank scorer, plus the per-variant
//! frequency and pathogenicity transforms.

use ferrovar_common::VariantEvaluation;

/// Assign 1-indexed ranks, best first. Ties share the average of the ranks
/// they span. Returns ranks in the same order as the input.
pub fn average_ranks(raw_scores: &[f64], higher_is_better: bool) -> Vec<f64> {
    let n = raw_scores.len();
    if n == 0 {
        return vec![];
    }

    let mut indexed: Vec<(usize, f64)> = raw_scores
        .iter()
        .copied()
        .enumerate()
        .collect();

    if higher_is_better {
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n - 1 && (indexed[j].1 - indexed[j + 1].1).abs() < 1e-10 {
            j += 1;
        }
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        for entry in &indexed[i..=j] {
            ranks[entry.0] = avg_rank;
        }
        i = j + 1;
    }

    ranks
}

/// Percentile of each score within the set: best → 1.0, worst → 1/N.
/// Makes scores comparable across runs with different gene-set sizes.
pub fn percentile_ranks(raw_scores: &[f64]) -> Vec<f64> {
    let n = raw_scores.len() as f64;
    average_ranks(raw_scores, true)
        .into_iter()
        .map(|rank| 1.0 - (rank - 1.0) / n)
        .collect()
}

/// Frequency component of a variant score. Common variants score 0.
/// Variants with no frequency data are treated as novel.
pub fn frequency_score(max_freq_percent: Option<f32>) -> f64 {
    match max_freq_percent {
        None => 1.0,
        Some(f) if f <= 0.0 => 1.0,
        Some(f) if f > 2.0 => 0.0,
        Some(f) => (1.13533 - 0.13533 * (f as f64).exp()).clamp(0.0, 1.0),
    }
}

pub fn pathogenicity_score(variant: &VariantEvaluation) -> f64 {
    match variant.pathogenicity_data {
        Some(p) if p.known_pathogenic => 1.0,
        Some(p) => (p.score as f64).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// frequency × pathogenicity
pub fn variant_score(variant: &VariantEvaluation) -> f64 {
    let freq = variant.frequency_data.map(|f| f.max_freq_percent);
    frequency_score(freq) * pathogenicity_score(variant)
}
