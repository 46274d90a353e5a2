//! Data sources the orchestrator reads from.
//!
//! Parsing VCF and pedigree files lives outside this crate; implementations
//! of these traits adapt whatever readers the caller has.

use std::path::{Path, PathBuf};

use ferrovar_common::{GeneIdentifier, Result, SampleData, VariantEvaluation};
use serde::{Deserialize, Serialize};

/// One pass over a variant file. Dropping the stream releases the file.
pub type VariantStream = Box<dyn Iterator<Item = Result<VariantEvaluation>> + Send>;

pub trait VariantSource: Send + Sync {
    fn open(&self, path: &Path) -> Result<VariantStream>;
}

/// Which sample to analyse and where its family structure is described.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDescriptor {
    pub proband_id: String,
    #[serde(default)]
    pub pedigree_path: Option<PathBuf>,
}

impl SampleDescriptor {
    pub fn new(proband_id: &str) -> Self {
        Self { proband_id: proband_id.to_string(), pedigree_path: None }
    }

    pub fn with_pedigree(mut self, path: impl Into<PathBuf>) -> Self {
        self.pedigree_path = Some(path.into());
        self
    }
}

pub trait SampleSource: Send + Sync {
    /// Every gene variants may be assigned to in this run.
    fn known_genes(&self) -> Result<Vec<GeneIdentifier>>;
    fn sample_data(&self, sample: &SampleDescriptor) -> Result<SampleData>;
}
