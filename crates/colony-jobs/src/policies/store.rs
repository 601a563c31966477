//! `StoreEnergy`: deliver carried energy to a structure.
//!
//! While walking out of range, the agent lays a road construction site
//! under itself (if the tile has none) and queues a `BuildStructure` job
//! for it. A tile is seeded at most once: the job is only queued when the
//! site was actually created and no job for that position is queued yet.

use colony_types::{ActionOutcome, AgentId, Job, StoreEnergy, StructureKind, Task};
use colony_world::World;
use tracing::debug;

use crate::action::{JobAction, JobContext, StepOutcome};
use crate::policies::{record_missing, reposition, resolve};

const ACTION: &str = "transfer";

/// Policy for [`StoreEnergy`] jobs.
#[derive(Debug, Clone, Copy)]
pub struct StorePolicy {
    /// Priority of seeded road jobs.
    pub road_priority: i32,
}

impl StorePolicy {
    fn seed_road(&self, ctx: &mut JobContext<'_>) {
        let Some(here) = ctx.world.agent_position(ctx.agent) else {
            return;
        };
        if ctx.world.construction_site_at(here).is_some() {
            return;
        }
        if !ctx
            .world
            .create_construction_site(here, StructureKind::Road)
            .is_ok()
        {
            return;
        }
        let task = Task::build_structure(here);
        if ctx.queue.contains_task(&task) {
            return;
        }
        ctx.queue.push(Job::new(task, self.road_priority));
        debug!(agent = %ctx.agent, position = %here, priority = self.road_priority, "Road job seeded");
    }
}

fn carries_energy(world: &dyn World, agent: AgentId) -> bool {
    world.agent_energy(agent).is_some_and(|energy| energy > 0)
}

impl JobAction for StorePolicy {
    type Payload = StoreEnergy;

    fn choose_if(&self, world: &dyn World, agent: AgentId, payload: &StoreEnergy) -> bool {
        world.structure_position(payload.target).is_some() && carries_energy(world, agent)
    }

    fn perform(&self, ctx: &mut JobContext<'_>, payload: &StoreEnergy) -> StepOutcome {
        let Some(target) = ctx.world.structure_position(payload.target) else {
            return record_missing(ctx, ACTION, payload.target);
        };
        match ctx.world.transfer_energy(ctx.agent, payload.target) {
            ActionOutcome::NotInRange => {
                self.seed_road(ctx);
                reposition(ctx, target)
            }
            outcome => resolve(ctx, ACTION, outcome, target),
        }
    }

    fn continue_if(&self, world: &dyn World, agent: AgentId, payload: &StoreEnergy) -> bool {
        carries_energy(world, agent)
            && world
                .structure_free_capacity(payload.target)
                .is_some_and(|free| free > 0)
    }
}
