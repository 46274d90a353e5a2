//! Family structure and sample metadata supplied by the sample source.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub id: String,
    pub father_id: Option<String>,
    pub mother_id: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    pub affected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pedigree {
    pub individuals: Vec<Individual>,
}

impl Pedigree {
    /// Pedigree for a lone affected proband.
    pub fn single_affected(id: &str) -> Self {
        Self {
            individuals: vec![Individual {
                id: id.to_string(),
                father_id: None,
                mother_id: None,
                sex: Sex::Unknown,
                affected: true,
            }],
        }
    }

    pub fn individual(&self, id: &str) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id == id)
    }

    pub fn affected(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(|i| i.affected)
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }
}

/// Per-sample metadata for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SampleData {
    pub proband_id: String,
    pub sample_names: Vec<String>,
    pub pedigree: Pedigree,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_affected_pedigree() {
        let ped = Pedigree::single_affected("proband");
        assert_eq!(ped.affected().count(), 1);
        assert!(ped.individual("proband").is_some());
        assert!(ped.individual("mother").is_none());
    }
}
