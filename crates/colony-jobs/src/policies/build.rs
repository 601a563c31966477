//! `BuildStructure`: spend energy on a construction site.
//!
//! One-off: once an agent drops the job (out of energy or the site is
//! finished) every queued copy of it is retired.

use colony_types::{AgentId, BuildStructure};
use colony_world::World;

use crate::action::{JobAction, JobContext, StepOutcome};
use crate::policies::{record_missing, resolve};

const ACTION: &str = "build";

/// Policy for [`BuildStructure`] jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildPolicy;

fn carries_energy(world: &dyn World, agent: AgentId) -> bool {
    world.agent_energy(agent).is_some_and(|energy| energy > 0)
}

impl JobAction for BuildPolicy {
    type Payload = BuildStructure;

    const ONE_OFF: bool = true;

    fn choose_if(&self, world: &dyn World, agent: AgentId, payload: &BuildStructure) -> bool {
        world.construction_site_at(payload.position).is_some() && carries_energy(world, agent)
    }

    fn perform(&self, ctx: &mut JobContext<'_>, payload: &BuildStructure) -> StepOutcome {
        if ctx.world.construction_site_at(payload.position).is_none() {
            return record_missing(ctx, ACTION, payload.position);
        }
        let outcome = ctx.world.build(ctx.agent, payload.position);
        resolve(ctx, ACTION, outcome, payload.position)
    }

    fn continue_if(&self, world: &dyn World, agent: AgentId, payload: &BuildStructure) -> bool {
        carries_energy(world, agent) && world.construction_site_at(payload.position).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{Position, StructureKind, Task};
    use colony_world::{SimWorld, World};

    use crate::action::StepOutcome;
    use crate::policies::fixtures::Harness;

    const SITE: Position = Position::new(5, 5);

    fn setup(at: Position) -> (Harness, Task) {
        let mut world = SimWorld::new();
        world.add_construction_site(SITE, StructureKind::Road).unwrap();
        let mut h = Harness::new(world, at);
        h.world.set_agent_energy(h.agent, 50).unwrap();
        (h, Task::build_structure(SITE))
    }

    #[test]
    fn builds_in_range() {
        let (mut h, task) = setup(Position::new(8, 5));
        assert!(h.choose_if(&task));
        assert_eq!(h.perform(&task), StepOutcome::Acted);
        assert_eq!(h.world.agent_energy(h.agent), Some(45));
        assert_eq!(h.world.construction_site_at(SITE).unwrap().progress, 5);
        assert!(h.continue_if(&task));
    }

    #[test]
    fn moves_when_far() {
        let (mut h, task) = setup(Position::new(9, 5));
        assert_eq!(h.perform(&task), StepOutcome::Moved);
        assert_eq!(h.world.agent_position(h.agent), Some(Position::new(8, 5)));
    }

    #[test]
    fn finished_site_is_missing() {
        let (mut h, task) = setup(Position::new(6, 5));
        for _ in 0..60 {
            h.world.set_agent_energy(h.agent, 50).unwrap();
            assert_eq!(h.perform(&task), StepOutcome::Acted);
        }
        assert!(h.world.has_road(SITE));
        assert!(!h.continue_if(&task));
        assert!(!h.choose_if(&task));
        assert_eq!(h.perform(&task), StepOutcome::Recorded);
        assert_eq!(
            h.memory.error.as_deref(),
            Some("build: target (5, 5) no longer exists")
        );
    }
}
