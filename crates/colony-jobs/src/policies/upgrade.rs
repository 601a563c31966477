//! `UpgradeController`: spend energy on the room controller.
//!
//! Agents only turn to the controller once the colony has enough workers
//! and they are already full, and they hold off at the hold level while
//! the downgrade timer still has a comfortable buffer.

use colony_types::{AgentId, UpgradeController};
use colony_world::World;

use crate::action::{JobAction, JobContext, StepOutcome};
use crate::policies::{record_missing, resolve};

const ACTION: &str = "upgrade";

/// Policy for [`UpgradeController`] jobs.
#[derive(Debug, Clone, Copy)]
pub struct UpgradePolicy {
    /// Minimum live population.
    pub min_population: usize,
    /// Controller level at which upgrading pauses.
    pub hold_level: u8,
    /// Downgrade timer above which the pause applies.
    pub hold_downgrade_ticks: u32,
}

impl JobAction for UpgradePolicy {
    type Payload = UpgradeController;

    fn choose_if(&self, world: &dyn World, agent: AgentId, payload: &UpgradeController) -> bool {
        let Some(status) = world.controller_status(payload.controller) else {
            return false;
        };
        let holding =
            status.level == self.hold_level && status.ticks_to_downgrade > self.hold_downgrade_ticks;
        world.population() >= self.min_population
            && world.agent_free_capacity(agent) == Some(0)
            && !holding
    }

    fn perform(&self, ctx: &mut JobContext<'_>, payload: &UpgradeController) -> StepOutcome {
        let Some(target) = ctx.world.controller_position(payload.controller) else {
            return record_missing(ctx, ACTION, payload.controller);
        };
        let outcome = ctx.world.upgrade_controller(ctx.agent, payload.controller);
        resolve(ctx, ACTION, outcome, target)
    }

    fn continue_if(&self, world: &dyn World, agent: AgentId, payload: &UpgradeController) -> bool {
        world.controller_position(payload.controller).is_some()
            && world.agent_energy(agent).is_some_and(|energy| energy > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{Position, Task};
    use colony_world::{SimWorld, World};

    use crate::action::StepOutcome;
    use crate::policies::fixtures::{Harness, WORKER};

    fn setup(extra_agents: usize) -> (Harness, Task) {
        let mut world = SimWorld::new();
        let controller = world.set_controller(Position::new(30, 10), 1).unwrap();
        for i in 0..extra_agents {
            let x = i32::try_from(i).unwrap();
            world.add_agent(Position::new(x, 40), &WORKER).unwrap();
        }
        let mut h = Harness::new(world, Position::new(30, 13));
        h.world.set_agent_energy(h.agent, 50).unwrap();
        (h, Task::upgrade_controller(controller))
    }

    #[test]
    fn small_colony_does_not_upgrade() {
        let (h, task) = setup(1);
        assert!(!h.choose_if(&task));
    }

    #[test]
    fn full_agent_in_large_colony_upgrades() {
        let (mut h, task) = setup(2);
        assert!(h.choose_if(&task));
        assert_eq!(h.perform(&task), StepOutcome::Acted);
        assert_eq!(h.world.agent_energy(h.agent), Some(49));
        assert!(h.continue_if(&task));
    }

    #[test]
    fn partially_full_agent_does_not_choose() {
        let (mut h, task) = setup(2);
        h.world.set_agent_energy(h.agent, 10).unwrap();
        assert!(!h.choose_if(&task));
    }

    #[test]
    fn holds_at_level_two_with_healthy_timer() {
        let (mut h, task) = setup(2);
        h.world.set_controller_state(2, 6000);
        assert!(!h.choose_if(&task));
        h.world.set_controller_state(2, 5000);
        assert!(h.choose_if(&task));
        h.world.set_controller_state(3, 20_000);
        assert!(h.choose_if(&task));
    }

    #[test]
    fn empty_agent_stops() {
        let (mut h, task) = setup(2);
        h.world.set_agent_energy(h.agent, 0).unwrap();
        assert!(!h.continue_if(&task));
    }
}
