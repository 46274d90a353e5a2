//! Grouping of consecutive steps that share a functional category.

use crate::steps::{AnalysisStep, FunctionalCategory};

#[derive(Debug, Clone, PartialEq)]
pub struct StepGroup {
    pub category: FunctionalCategory,
    pub steps: Vec<AnalysisStep>,
}

impl StepGroup {
    pub fn is_variant_filter_group(&self) -> bool {
        self.category == FunctionalCategory::VariantFilter
    }

    pub fn is_inheritance_mode_dependent(&self) -> bool {
        self.category == FunctionalCategory::InheritanceModeDependent
    }
}

/// Split `steps` into maximal runs of one category, preserving order.
pub fn group_steps(steps: &[AnalysisStep]) -> Vec<StepGroup> {
    let mut groups: Vec<StepGroup> = Vec::new();
    for step in steps {
        let category = step.category();
        match groups.last_mut() {
            Some(group) if group.category == category => group.steps.push(step.clone()),
            _ => groups.push(StepGroup { category, steps: vec![step.clone()] }),
        }
    }
    groups
}
