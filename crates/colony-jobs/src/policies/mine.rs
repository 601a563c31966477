//! `MineEnergy`: harvest a source until the agent is full.

use colony_types::{AgentId, MineEnergy};
use colony_world::World;

use crate::action::{JobAction, JobContext, StepOutcome};
use crate::policies::{record_missing, resolve};

const ACTION: &str = "harvest";

/// Policy for [`MineEnergy`] jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinePolicy;

impl JobAction for MinePolicy {
    type Payload = MineEnergy;

    fn choose_if(&self, world: &dyn World, agent: AgentId, payload: &MineEnergy) -> bool {
        world.source_position(payload.source).is_some()
            && world.agent_free_capacity(agent).is_some_and(|free| free > 0)
    }

    fn perform(&self, ctx: &mut JobContext<'_>, payload: &MineEnergy) -> StepOutcome {
        let Some(target) = ctx.world.source_position(payload.source) else {
            return record_missing(ctx, ACTION, payload.source);
        };
        let outcome = ctx.world.harvest(ctx.agent, payload.source);
        resolve(ctx, ACTION, outcome, target)
    }

    fn continue_if(&self, world: &dyn World, agent: AgentId, payload: &MineEnergy) -> bool {
        world.source_position(payload.source).is_some()
            && world.agent_free_capacity(agent).is_some_and(|free| free > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{Position, Task};
    use colony_world::{SimWorld, World};

    use crate::action::StepOutcome;
    use crate::policies::fixtures::Harness;

    fn setup(at: Position) -> (Harness, Task, colony_types::SourceId) {
        let mut world = SimWorld::new();
        let source = world.add_source(Position::new(10, 10)).unwrap();
        (Harness::new(world, at), Task::mine_energy(source), source)
    }

    #[test]
    fn moves_then_harvests() {
        let (mut h, task, _) = setup(Position::new(13, 10));
        assert!(h.choose_if(&task));
        assert_eq!(h.perform(&task), StepOutcome::Moved);
        assert_eq!(h.perform(&task), StepOutcome::Moved);
        assert_eq!(h.perform(&task), StepOutcome::Acted);
        assert_eq!(h.world.agent_energy(h.agent), Some(2));
        assert!(h.continue_if(&task));
        assert!(h.memory.error.is_none());
    }

    #[test]
    fn full_agent_neither_chooses_nor_continues() {
        let (mut h, task, _) = setup(Position::new(11, 10));
        h.world.set_agent_energy(h.agent, 50).unwrap();
        assert!(!h.choose_if(&task));
        assert!(!h.continue_if(&task));
    }

    #[test]
    fn vanished_source_records_error() {
        let (mut h, task, source) = setup(Position::new(11, 10));
        assert!(h.world.remove_source(source));
        assert!(!h.choose_if(&task));
        assert_eq!(h.perform(&task), StepOutcome::Recorded);
        assert_eq!(
            h.memory.error.as_deref(),
            Some(format!("harvest: target {source} no longer exists").as_str())
        );
        assert!(!h.continue_if(&task));
    }
}
