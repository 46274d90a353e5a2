//! Gene score computation.
//!
//! Two interchangeable scorers turn prioritizer output and filter status into
//! a final per-gene score:
//!
//! - raw:  S(g) = w_v × V(g) + w_p × P(g)
//! - rank: S(g) = percentile of the raw S(g) among all eligible genes
//!
//! V(g) is the best passing-variant score (mean of the best two for recessive
//! modes), P(g) is the product of the gene's prioritizer scores. Genes with no
//! passing variants are not scored at all.

use ferrovar_common::{Gene, GeneScore, ModeOfInheritance, ScoringMode, VariantEvaluation};
use tracing::debug;

use crate::normalise::{percentile_ranks, variant_score};
use crate::weights::ScoreWeights;

/// Strategy assigning a `GeneScore` to every score-eligible gene.
pub trait GeneScorer: Send + Sync {
    fn score_genes(&self, genes: &mut [Gene], modes: &[ModeOfInheritance]);
}

/// Build the scorer for a scoring mode.
pub fn scorer_for(mode: ScoringMode, weights: ScoreWeights) -> Box<dyn GeneScorer> {
    match mode {
        ScoringMode::RawScore => Box::new(RawScoreGeneScorer::new(weights)),
        ScoringMode::RankBased => Box::new(RankBasedGeneScorer::new(weights)),
    }
}

/// A gene can be scored only if at least one of its variants passed filtering.
pub fn is_score_eligible(gene: &Gene) -> bool {
    gene.has_passed_variant()
}

/// Product of all prioritizer scores; 1.0 when no prioritizer ran.
pub fn priority_score(gene: &Gene) -> f64 {
    gene.priority_results().map(|r| r.score).product()
}

/// Variant component of the gene score under one inheritance mode.
///
/// When the gene carries inheritance annotations only variants compatible
/// with `mode` count; otherwise every passing variant does.
pub fn gene_variant_score(gene: &Gene, mode: ModeOfInheritance) -> f64 {
    let restrict = !mode.is_any() && !gene.compatible_modes().is_empty();
    let mut scores: Vec<f64> = gene
        .passed_variants()
        .filter(|v| !restrict || v.is_compatible_with(mode))
        .map(variant_score)
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    if mode.is_recessive() && scores.len() >= 2 {
        (scores[0] + scores[1]) / 2.0
    } else {
        scores[0]
    }
}

/// Best raw score over the requested modes.
fn best_raw_score(gene: &Gene, modes: &[ModeOfInheritance], weights: &ScoreWeights) -> GeneScore {
    let priority = priority_score(gene);
    let candidates: Vec<ModeOfInheritance> = if modes.is_empty() {
        vec![ModeOfInheritance::Any]
    } else {
        modes.to_vec()
    };

    candidates
        .into_iter()
        .map(|mode| {
            let variant = gene_variant_score(gene, mode);
            GeneScore {
                mode,
                variant_score: variant,
                priority_score: priority,
                combined_score: weights.variant * variant + weights.priority * priority,
            }
        })
        .fold(None, |best: Option<GeneScore>, score| match best {
            Some(b) if b.combined_score >= score.combined_score => Some(b),
            _ => Some(score),
        })
        .unwrap_or(GeneScore {
            mode: ModeOfInheritance::Any,
            variant_score: 0.0,
            priority_score: priority,
            combined_score: weights.priority * priority,
        })
}

// ── Raw score ─────────────────────────────────────────────────────────────────

pub struct RawScoreGeneScorer {
    weights: ScoreWeights,
}

impl RawScoreGeneScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }
}

impl GeneScorer for RawScoreGeneScorer {
    fn score_genes(&self, genes: &mut [Gene], modes: &[ModeOfInheritance]) {
        let mut scored = 0usize;
        for gene in genes.iter_mut().filter(|g| is_score_eligible(g)) {
            let score = best_raw_score(gene, modes, &self.weights);
            gene.set_score(score);
            scored += 1;
        }
        debug!(scored, total = genes.len(), "Raw gene scores assigned");
    }
}

// ── Rank based ────────────────────────────────────────────────────────────────

pub struct RankBasedGeneScorer {
    weights: ScoreWeights,
}

impl RankBasedGeneScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }
}

impl GeneScorer for RankBasedGeneScorer {
    fn score_genes(&self, genes: &mut [Gene], modes: &[ModeOfInheritance]) {
        let eligible: Vec<usize> = genes
            .iter()
            .enumerate()
            .filter(|(_, g)| is_score_eligible(g))
            .map(|(i, _)| i)
            .collect();

        let raw: Vec<GeneScore> = eligible
            .iter()
            .map(|&i| best_raw_score(&genes[i], modes, &self.weights))
            .collect();
        let combined: Vec<f64> = raw.iter().map(|s| s.combined_score).collect();
        let percentiles = percentile_ranks(&combined);

        for ((&i, raw_score), percentile) in eligible.iter().zip(raw).zip(percentiles) {
            genes[i].set_score(GeneScore {
                combined_score: percentile,
                ..raw_score
            });
        }
        debug!(scored = eligible.len(), total = genes.len(), "Rank-based gene scores assigned");
    }
}

/// Order genes best first. Unscored genes go last; ties break on symbol.
pub fn sort_by_score(genes: &mut [Gene]) {
    genes.sort_by(|a, b| match (a.combined_score(), b.combined_score()) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.symbol.cmp(&b.symbol),
    });
}

/// Best-scoring variant of a gene, for reporting.
pub fn top_variant(gene: &Gene) -> Option<&VariantEvaluation> {
    gene.passed_variants().max_by(|a, b| {
        variant_score(a)
            .partial_cmp(&variant_score(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
