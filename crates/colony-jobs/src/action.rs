//! The job action table.
//!
//! Every job kind has a policy implementing [`JobAction`]: when an agent
//! may pick the job up, what one step of work looks like, and whether the
//! agent keeps the job afterwards. [`ActionTable`] owns one configured
//! policy per kind and dispatches on the [`Task`] variant, so the worker
//! loop never needs to know which job types exist.

use colony_types::{AgentId, AgentMemory, JobKind, JobQueue, Task};
use colony_world::World;

use crate::policies::{
    BuildPolicy, MinePolicy, PolicyConfig, StorePolicy, UpgradePolicy,
};

/// Mutable state a policy may touch while performing a step.
pub struct JobContext<'a> {
    /// The world to act on.
    pub world: &'a mut dyn World,
    /// The acting agent.
    pub agent: AgentId,
    /// The acting agent's persisted record.
    pub memory: &'a mut AgentMemory,
    /// The shared job queue, for policies that seed follow-up work.
    pub queue: &'a mut JobQueue,
}

impl core::fmt::Debug for JobContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JobContext")
            .field("agent", &self.agent)
            .field("memory", &self.memory)
            .field("queued_jobs", &self.queue.len())
            .finish_non_exhaustive()
    }
}

/// What a single `perform` step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The world action succeeded.
    Acted,
    /// The agent was out of range and stepped toward the target.
    Moved,
    /// The action failed and a diagnostic was written to the agent's memory.
    Recorded,
}

/// Per-kind job behaviour.
///
/// `perform` never fails and never panics: every world outcome is mapped
/// to success, a reposition, or a recorded error.
pub trait JobAction {
    /// The task payload this policy handles.
    type Payload;

    /// Whether the job is removed from the queue once an agent drops it.
    const ONE_OFF: bool = false;

    /// Whether `agent` should pick this job up. Must not mutate anything.
    fn choose_if(&self, world: &dyn World, agent: AgentId, payload: &Self::Payload) -> bool;

    /// Execute one step of the job.
    fn perform(&self, ctx: &mut JobContext<'_>, payload: &Self::Payload) -> StepOutcome;

    /// Whether the agent keeps the job after this tick's step.
    fn continue_if(&self, world: &dyn World, agent: AgentId, payload: &Self::Payload) -> bool;
}

/// One configured policy per job kind.
#[derive(Debug, Clone)]
pub struct ActionTable {
    mine: MinePolicy,
    store: StorePolicy,
    upgrade: UpgradePolicy,
    build: BuildPolicy,
}

impl ActionTable {
    /// Build the table from policy tunables.
    pub const fn new(config: &PolicyConfig) -> Self {
        Self {
            mine: MinePolicy,
            store: StorePolicy {
                road_priority: config.road_priority,
            },
            upgrade: UpgradePolicy {
                min_population: config.upgrade_min_population,
                hold_level: config.upgrade_hold_level,
                hold_downgrade_ticks: config.upgrade_hold_downgrade_ticks,
            },
            build: BuildPolicy,
        }
    }

    /// Dispatch `choose_if` for `task`.
    pub fn choose_if(&self, world: &dyn World, agent: AgentId, task: &Task) -> bool {
        match task {
            Task::MineEnergy(p) => self.mine.choose_if(world, agent, p),
            Task::StoreEnergy(p) => self.store.choose_if(world, agent, p),
            Task::UpgradeController(p) => self.upgrade.choose_if(world, agent, p),
            Task::BuildStructure(p) => self.build.choose_if(world, agent, p),
        }
    }

    /// Dispatch `perform` for `task`.
    pub fn perform(&self, ctx: &mut JobContext<'_>, task: &Task) -> StepOutcome {
        match task {
            Task::MineEnergy(p) => self.mine.perform(ctx, p),
            Task::StoreEnergy(p) => self.store.perform(ctx, p),
            Task::UpgradeController(p) => self.upgrade.perform(ctx, p),
            Task::BuildStructure(p) => self.build.perform(ctx, p),
        }
    }

    /// Dispatch `continue_if` for `task`.
    pub fn continue_if(&self, world: &dyn World, agent: AgentId, task: &Task) -> bool {
        match task {
            Task::MineEnergy(p) => self.mine.continue_if(world, agent, p),
            Task::StoreEnergy(p) => self.store.continue_if(world, agent, p),
            Task::UpgradeController(p) => self.upgrade.continue_if(world, agent, p),
            Task::BuildStructure(p) => self.build.continue_if(world, agent, p),
        }
    }

    /// Whether jobs of `kind` leave the queue when an agent drops them.
    pub const fn one_off(kind: JobKind) -> bool {
        match kind {
            JobKind::MineEnergy => <MinePolicy as JobAction>::ONE_OFF,
            JobKind::StoreEnergy => <StorePolicy as JobAction>::ONE_OFF,
            JobKind::UpgradeController => <UpgradePolicy as JobAction>::ONE_OFF,
            JobKind::BuildStructure => <BuildPolicy as JobAction>::ONE_OFF,
        }
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_build_is_one_off() {
        assert!(!ActionTable::one_off(JobKind::MineEnergy));
        assert!(!ActionTable::one_off(JobKind::StoreEnergy));
        assert!(!ActionTable::one_off(JobKind::UpgradeController));
        assert!(ActionTable::one_off(JobKind::BuildStructure));
    }
}
