//! Run observation.
//!
//! Components that report progress or repairs take an observer instead of
//! logging directly, so callers can capture what happened in a run.

use serde::Serialize;
use tracing::{info, warn};

use crate::batching::StepGroup;
use crate::normalise::StepRepair;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamProgress {
    pub streamed: u64,
    pub passed: u64,
}

pub trait RunObserver: Send + Sync {
    fn on_progress(&self, _progress: StreamProgress) {}
    fn on_repair(&self, _repair: &StepRepair) {}
    fn on_notice(&self, _notice: &str) {}
    fn on_group_started(&self, _index: usize, _group: &StepGroup) {}
}

/// Forwards observations to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_progress(&self, progress: StreamProgress) {
        info!(
            streamed = progress.streamed,
            passed = progress.passed,
            "Loaded variants"
        );
    }

    fn on_repair(&self, repair: &StepRepair) {
        warn!(%repair, "Step order repaired");
    }

    fn on_notice(&self, notice: &str) {
        info!(notice, "Analysis steps noted");
    }

    fn on_group_started(&self, index: usize, group: &StepGroup) {
        info!(index, category = ?group.category, steps = ?group.steps, "Running step group");
    }
}
