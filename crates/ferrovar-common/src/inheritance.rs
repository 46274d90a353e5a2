//! Modes of inheritance a gene or variant can be compatible with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeOfInheritance {
    AutosomalDominant,
    AutosomalRecessive,
    XDominant,
    XRecessive,
    Mitochondrial,
    /// No particular mode selected. Inheritance analysis is skipped.
    Any,
}

impl ModeOfInheritance {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOfInheritance::AutosomalDominant  => "AUTOSOMAL_DOMINANT",
            ModeOfInheritance::AutosomalRecessive => "AUTOSOMAL_RECESSIVE",
            ModeOfInheritance::XDominant          => "X_DOMINANT",
            ModeOfInheritance::XRecessive         => "X_RECESSIVE",
            ModeOfInheritance::Mitochondrial      => "MITOCHONDRIAL",
            ModeOfInheritance::Any                => "ANY",
        }
    }

    /// Recessive modes need two hits, so scoring looks at the two best variants.
    pub fn is_recessive(&self) -> bool {
        matches!(self, ModeOfInheritance::AutosomalRecessive | ModeOfInheritance::XRecessive)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, ModeOfInheritance::Any)
    }
}

impl std::fmt::Display for ModeOfInheritance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
