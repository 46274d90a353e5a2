//! Weight vector for the raw gene score.

use ferrovar_common::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Weights for the two gene score components. They sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Best variant score (frequency × pathogenicity)
    pub variant: f64,
    /// Product of the gene's prioritizer scores
    pub priority: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            variant:  0.5,
            priority: 0.5,
        }
    }
}

impl ScoreWeights {
    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        (self.variant + self.priority - 1.0).abs() < 1e-6
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.variant + self.priority;
        if sum > 0.0 {
            self.variant  /= sum;
            self.priority /= sum;
        }
    }
}

impl From<&ScoringConfig> for ScoreWeights {
    fn from(config: &ScoringConfig) -> Self {
        let mut weights = Self {
            variant: config.variant,
            priority: config.priority,
        };
        weights.normalise();
        weights
    }
}
