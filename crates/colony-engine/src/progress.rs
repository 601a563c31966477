//! Tick callback that reports colony progress through `tracing`.

use colony_core::{TickCallback, TickFailure, TickSummary};
use colony_types::ColonyMemory;
use tracing::{info, warn};

/// Logs a population report every `every` ticks and every failed tick.
pub struct ProgressCallback {
    every: u64,
    failures: u64,
}

impl ProgressCallback {
    /// Report every `every` ticks. Zero disables periodic reports.
    pub const fn new(every: u64) -> Self {
        Self { every, failures: 0 }
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, memory: &ColonyMemory) {
        let due = summary
            .tick
            .checked_rem(self.every)
            .is_some_and(|r| r == 0);
        if !due {
            return;
        }
        let committed = memory
            .agents
            .values()
            .filter(|record| record.current_job.is_some())
            .count();
        info!(
            tick = summary.tick,
            agents = summary.agents_alive,
            committed,
            queued = summary.queue_len,
            failures = self.failures,
            "Colony progress"
        );
    }

    fn on_tick_failed(&mut self, tick: u64, failure: &TickFailure) {
        self.failures = self.failures.saturating_add(1);
        warn!(tick, error = %failure, total = self.failures, "Tick discarded");
    }
}
