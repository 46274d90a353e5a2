//! Step order normalisation.
//!
//! Users may list steps in any order. Before a run the list is repaired so
//! that:
//!
//! - inheritance-mode-dependent steps come after every variant filter,
//! - priority score filters without a matching prioritizer are dropped,
//! - each remaining priority score filter directly follows its prioritizer,
//! - an inheritance filter precedes an OMIM prioritizer.
//!
//! Repairs and notices are returned to the caller, never raised or logged.

use std::cmp::Ordering;
use std::fmt;

use ferrovar_common::PriorityType;

use crate::steps::AnalysisStep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRepair {
    MovedInheritanceDependentSteps,
    RemovedPriorityScoreFilter { priority_type: PriorityType },
    MovedPriorityScoreFilters,
    ReorderedSteps,
}

impl fmt::Display for StepRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRepair::MovedInheritanceDependentSteps => {
                write!(f, "moved inheritance-mode dependent steps after the last variant filter")
            }
            StepRepair::RemovedPriorityScoreFilter { priority_type } => write!(
                f,
                "removed {priority_type} priority score filter with no matching prioritizer"
            ),
            StepRepair::MovedPriorityScoreFilters => {
                write!(f, "moved priority score filters next to their prioritizers")
            }
            StepRepair::ReorderedSteps => write!(f, "reordered steps to satisfy step dependencies"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalisedSteps {
    pub steps: Vec<AnalysisStep>,
    pub repairs: Vec<StepRepair>,
    /// Performance caveats that changed nothing.
    pub notices: Vec<String>,
}

impl NormalisedSteps {
    pub fn is_unchanged(&self) -> bool {
        self.repairs.is_empty()
    }
}

/// Repair `steps` into a valid execution order.
pub fn normalise_steps(steps: Vec<AnalysisStep>) -> NormalisedSteps {
    let mut out = NormalisedSteps { steps, ..Default::default() };
    if out.steps.len() < 2 {
        return out;
    }

    move_inheritance_dependent_steps(&mut out);
    remove_orphan_priority_score_filters(&mut out);
    move_priority_score_filters(&mut out);
    if partial_order_sort(&mut out.steps) {
        out.repairs.push(StepRepair::ReorderedSteps);
    }
    out
}

// ── Rules ─────────────────────────────────────────────────────────────────────

fn move_inheritance_dependent_steps(out: &mut NormalisedSteps) {
    if !out.steps.iter().any(AnalysisStep::is_inheritance_mode_dependent) {
        return;
    }
    if !out.steps.iter().any(AnalysisStep::is_variant_filter) {
        out.notices.push(
            "No variant filters configured: inheritance modes will be computed over every variant, \
             which may be slow"
                .to_string(),
        );
        return;
    }

    let before = out.steps.clone();
    let (mut block, mut rest): (Vec<_>, Vec<_>) = std::mem::take(&mut out.steps)
        .into_iter()
        .partition(AnalysisStep::is_inheritance_mode_dependent);
    partial_order_sort(&mut block);

    // `rest` still holds every variant filter.
    let insert_at = rest
        .iter()
        .rposition(AnalysisStep::is_variant_filter)
        .map_or(0, |i| i + 1);
    rest.splice(insert_at..insert_at, block);
    out.steps = rest;

    if out.steps != before {
        out.repairs.push(StepRepair::MovedInheritanceDependentSteps);
    }
}

fn remove_orphan_priority_score_filters(out: &mut NormalisedSteps) {
    let steps = std::mem::take(&mut out.steps);
    let mut kept = Vec::with_capacity(steps.len());
    for step in &steps {
        if let AnalysisStep::PriorityScoreFilter(filter) = step {
            if !steps.iter().any(|s| s.is_prioritizer_of(filter.priority_type)) {
                out.repairs.push(StepRepair::RemovedPriorityScoreFilter {
                    priority_type: filter.priority_type,
                });
                continue;
            }
        }
        kept.push(step.clone());
    }
    out.steps = kept;
}

/// Every priority score filter here has a matching prioritizer.
fn move_priority_score_filters(out: &mut NormalisedSteps) {
    let before = out.steps.clone();
    let (filters, mut steps): (Vec<_>, Vec<_>) = std::mem::take(&mut out.steps)
        .into_iter()
        .partition(|s| matches!(s, AnalysisStep::PriorityScoreFilter(_)));

    for filter in filters {
        let Some(priority_type) = filter.priority_type() else {
            continue;
        };
        let Some(prioritizer) = steps.iter().position(|s| s.is_prioritizer_of(priority_type)) else {
            continue;
        };
        let mut insert_at = prioritizer + 1;
        while steps
            .get(insert_at)
            .is_some_and(|s| s.is_priority_score_filter_for(priority_type))
        {
            insert_at += 1;
        }
        steps.insert(insert_at, filter);
    }
    out.steps = steps;

    if out.steps != before {
        out.repairs.push(StepRepair::MovedPriorityScoreFilters);
    }
}

// ── Partial order ─────────────────────────────────────────────────────────────

/// Pairwise order between two steps; `Equal` means unconstrained.
pub fn step_order(a: &AnalysisStep, b: &AnalysisStep) -> Ordering {
    if a.is_inheritance_mode_dependent() && b.is_variant_filter() {
        return Ordering::Greater;
    }
    if a.is_variant_filter() && b.is_inheritance_mode_dependent() {
        return Ordering::Less;
    }
    if inheritance_before_omim(a, b) {
        return Ordering::Less;
    }
    if inheritance_before_omim(b, a) {
        return Ordering::Greater;
    }
    match (a, b) {
        (AnalysisStep::Prioritizer(p), AnalysisStep::PriorityScoreFilter(f))
            if p.priority_type() == f.priority_type =>
        {
            Ordering::Less
        }
        (AnalysisStep::PriorityScoreFilter(f), AnalysisStep::Prioritizer(p))
            if p.priority_type() == f.priority_type =>
        {
            Ordering::Greater
        }
        _ => Ordering::Equal,
    }
}

fn inheritance_before_omim(a: &AnalysisStep, b: &AnalysisStep) -> bool {
    matches!(a, AnalysisStep::InheritanceFilter(_)) && b.is_prioritizer_of(PriorityType::Omim)
}

/// Stable insertion sort under `step_order`. Each step moves left past any
/// step it must precede, but never past one it must follow. Repeats until no
/// step moves; the relation is acyclic so this terminates.
fn partial_order_sort(steps: &mut Vec<AnalysisStep>) -> bool {
    let mut changed = false;
    loop {
        let mut moved = false;
        for i in 1..steps.len() {
            let mut target = i;
            for j in (0..i).rev() {
                match step_order(&steps[i], &steps[j]) {
                    Ordering::Less => target = j,
                    Ordering::Greater => break,
                    Ordering::Equal => {}
                }
            }
            if target != i {
                let step = steps.remove(i);
                steps.insert(target, step);
                moved = true;
            }
        }
        if !moved {
            return changed;
        }
        changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrovar_common::{FilterType, ModeOfInheritance};
    use pretty_assertions::assert_eq;

    use crate::filters::GeneSymbolFilter;
    use crate::test_support::{StubPrioritizer, StubVariantFilter};

    fn vf(t: FilterType) -> AnalysisStep {
        AnalysisStep::variant_filter(StubVariantFilter::passing(t))
    }

    fn prio(t: PriorityType) -> AnalysisStep {
        AnalysisStep::prioritizer(StubPrioritizer::new(t))
    }

    fn psf(t: PriorityType) -> AnalysisStep {
        AnalysisStep::priority_score_filter(t, 0.5)
    }

    fn inh() -> AnalysisStep {
        AnalysisStep::inheritance_filter([ModeOfInheritance::AutosomalDominant])
    }

    fn genes() -> AnalysisStep {
        AnalysisStep::gene_filter(GeneSymbolFilter::new(["FGFR2"]))
    }

    fn labels(steps: &[AnalysisStep]) -> Vec<String> {
        steps.iter().map(|s| format!("{s:?}")).collect()
    }

    #[test]
    fn test_short_lists_are_unchanged() {
        assert!(normalise_steps(vec![]).steps.is_empty());

        let lone = psf(PriorityType::HiPhive);
        let out = normalise_steps(vec![lone.clone()]);
        assert_eq!(out.steps, vec![lone]);
        assert!(out.is_unchanged());
    }

    #[test]
    fn test_inheritance_steps_follow_last_variant_filter() {
        let freq = vf(FilterType::Frequency);
        let path = vf(FilterType::Pathogenicity);
        let inh = inh();
        let omim = prio(PriorityType::Omim);
        let hiphive = prio(PriorityType::HiPhive);

        let out = normalise_steps(vec![
            omim.clone(),
            freq.clone(),
            inh.clone(),
            hiphive.clone(),
            path.clone(),
        ]);

        assert_eq!(out.steps, vec![freq, hiphive, path, inh, omim]);
        assert!(out.repairs.contains(&StepRepair::MovedInheritanceDependentSteps));
    }

    #[test]
    fn test_no_variant_filter_gives_notice_only() {
        let inh = inh();
        let hiphive = prio(PriorityType::HiPhive);
        let out = normalise_steps(vec![inh.clone(), hiphive.clone()]);
        assert_eq!(out.steps, vec![inh, hiphive]);
        assert!(out.repairs.is_empty());
        assert_eq!(out.notices.len(), 1);
    }

    #[test]
    fn test_orphan_priority_score_filter_removed() {
        let inh = inh();
        let out = normalise_steps(vec![psf(PriorityType::HiPhive), inh.clone()]);
        assert_eq!(out.steps, vec![inh]);
        assert_eq!(
            out.repairs,
            vec![StepRepair::RemovedPriorityScoreFilter { priority_type: PriorityType::HiPhive }]
        );
    }

    #[test]
    fn test_priority_score_filter_follows_its_prioritizer() {
        let phive = prio(PriorityType::Phive);
        let filter = psf(PriorityType::Phive);
        let genes = genes();

        let out = normalise_steps(vec![filter.clone(), genes.clone(), phive.clone()]);

        assert_eq!(out.steps, vec![genes, phive, filter]);
        assert!(out.repairs.contains(&StepRepair::MovedPriorityScoreFilters));
    }

    #[test]
    fn test_several_filters_keep_their_order() {
        let hiphive = prio(PriorityType::HiPhive);
        let strict = AnalysisStep::priority_score_filter(PriorityType::HiPhive, 0.8);
        let loose = AnalysisStep::priority_score_filter(PriorityType::HiPhive, 0.2);

        let out = normalise_steps(vec![strict.clone(), loose.clone(), hiphive.clone()]);
        assert_eq!(out.steps, vec![hiphive, strict, loose]);
    }

    #[test]
    fn test_inheritance_filter_precedes_omim() {
        let freq = vf(FilterType::Frequency);
        let omim = prio(PriorityType::Omim);
        let inh = inh();

        let out = normalise_steps(vec![freq.clone(), omim.clone(), inh.clone()]);
        assert_eq!(labels(&out.steps), labels(&[freq, inh, omim]));
    }

    #[test]
    fn test_valid_order_reports_nothing() {
        let steps = vec![
            vf(FilterType::Quality),
            vf(FilterType::Frequency),
            inh(),
            prio(PriorityType::Omim),
            prio(PriorityType::HiPhive),
            psf(PriorityType::HiPhive),
            genes(),
        ];
        let out = normalise_steps(steps.clone());
        assert_eq!(out.steps, steps);
        assert!(out.is_unchanged());
    }

    #[test]
    fn test_normalisation_is_idempotent() {
        let lists = vec![
            vec![inh(), vf(FilterType::Frequency), psf(PriorityType::HiPhive), prio(PriorityType::HiPhive)],
            vec![prio(PriorityType::Omim), psf(PriorityType::Omim), inh(), vf(FilterType::Quality), genes()],
            vec![psf(PriorityType::Phenix), genes(), vf(FilterType::Frequency), inh()],
            vec![genes(), inh(), prio(PriorityType::Omim), prio(PriorityType::Phive), psf(PriorityType::Phive)],
        ];
        for steps in lists {
            let once = normalise_steps(steps);
            let twice = normalise_steps(once.steps.clone());
            assert_eq!(twice.steps, once.steps);
            assert!(twice.is_unchanged(), "{:?}", twice.repairs);
        }
    }
}
