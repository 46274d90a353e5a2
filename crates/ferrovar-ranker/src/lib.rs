//! ferrovar-ranker — Gene scoring for ranked analysis results.

pub mod normalise;
pub mod scorer;
pub mod weights;

pub use scorer::{
    scorer_for, sort_by_score, top_variant, GeneScorer, RankBasedGeneScorer, RawScoreGeneScorer,
};
pub use weights::ScoreWeights;
