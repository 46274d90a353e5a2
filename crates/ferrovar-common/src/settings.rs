//! Analysis settings.
//!
//! Run-level options for an analysis, loadable from YAML, TOML or JSON.
//! The analysis steps themselves are built in code; these settings carry
//! everything else the orchestrator needs to know.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::inheritance::ModeOfInheritance;

/// Complete settings for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisSettings {
    /// Retention, scoring and inheritance options
    #[serde(default)]
    pub run: RunConfig,

    /// Gene score weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Population and pathogenicity sources handed to data-provider filters
    #[serde(default)]
    pub sources: SourceConfig,
}

// ── Modes ─────────────────────────────────────────────────────────────────────

/// Which records are kept while and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetentionMode {
    /// Keep every variant and run every filter on every record.
    #[default]
    Full,
    /// Keep every variant, stop filtering a record at its first failure.
    Sparse,
    /// Keep only records that pass, stop filtering at the first failure.
    PassOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    RawScore,
    RankBased,
}

// ── Run ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub retention_mode: RetentionMode,

    #[serde(default)]
    pub scoring_mode: ScoringMode,

    /// Modes to test genes against. `ANY` alone disables inheritance analysis.
    #[serde(default = "default_inheritance_modes")]
    pub inheritance_modes: BTreeSet<ModeOfInheritance>,

    /// Emit a progress observation every N streamed variants
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_inheritance_modes() -> BTreeSet<ModeOfInheritance> {
    BTreeSet::from([ModeOfInheritance::Any])
}
fn default_progress_interval() -> u64 { 100_000 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            retention_mode: RetentionMode::default(),
            scoring_mode: ScoringMode::default(),
            inheritance_modes: default_inheritance_modes(),
            progress_interval: default_progress_interval(),
        }
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Weights combining the variant and phenotype components of a gene score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight for the best variant score (frequency × pathogenicity)
    #[serde(default = "default_variant_weight")]
    pub variant: f64,

    /// Weight for the combined prioritizer score
    #[serde(default = "default_priority_weight")]
    pub priority: f64,
}

fn default_variant_weight() -> f64 { 0.5 }
fn default_priority_weight() -> f64 { 0.5 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            variant: default_variant_weight(),
            priority: default_priority_weight(),
        }
    }
}

impl ScoringConfig {
    /// Validate weights sum to 1.0
    pub fn validate(&self) -> bool {
        (self.variant + self.priority - 1.0).abs() < 0.01
    }

    /// Normalize weights to sum to 1.0
    pub fn normalize(&mut self) {
        let sum = self.variant + self.priority;
        if sum > 0.0 {
            self.variant /= sum;
            self.priority /= sum;
        }
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencySource {
    GnomadExomes,
    GnomadGenomes,
    TopMed,
    Uk10k,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathogenicitySource {
    Revel,
    MutationTaster,
    Polyphen,
    Sift,
    Cadd,
    ClinVar,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    #[serde(default)]
    pub frequency: BTreeSet<FrequencySource>,

    #[serde(default)]
    pub pathogenicity: BTreeSet<PathogenicitySource>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl AnalysisSettings {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from the path in FERROVAR_CONFIG, falling back to ferrovar.yml.
    /// The format is picked from the file extension.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("FERROVAR_CONFIG")
            .unwrap_or_else(|_| "ferrovar.yml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!("Settings file not found: {}", path);
        }

        let settings = match Path::new(&path).extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&path)?,
            Some("json") => Self::from_json(&path)?,
            _ => Self::from_yaml(&path)?,
        };

        if !settings.scoring.validate() {
            tracing::warn!(
                variant = settings.scoring.variant,
                priority = settings.scoring.priority,
                "Scoring weights do not sum to 1.0; they will be normalised"
            );
        }
        Ok(settings)
    }

    /// Modes that actually request inheritance analysis.
    pub fn requested_modes(&self) -> Vec<ModeOfInheritance> {
        self.run
            .inheritance_modes
            .iter()
            .copied()
            .filter(|m| !m.is_any())
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
