//! Per-kind job policies.
//!
//! - [`mine`] -- Harvest a source until the agent is full.
//! - [`store`] -- Deliver energy to a structure, seeding roads on the way.
//! - [`upgrade`] -- Spend energy on the controller once the colony can spare it.
//! - [`build`] -- Finish a construction site; retired once dropped.

pub mod build;
pub mod mine;
pub mod store;
pub mod upgrade;

use core::fmt::Display;

use colony_types::{ActionOutcome, Position};
use tracing::debug;

use crate::action::{JobContext, StepOutcome};

pub use build::BuildPolicy;
pub use mine::MinePolicy;
pub use store::StorePolicy;
pub use upgrade::UpgradePolicy;

/// Tunables shared by the policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Minimum population before agents divert energy to the controller
    /// (default: 3).
    pub upgrade_min_population: usize,
    /// Controller level at which upgrading pauses while the downgrade timer
    /// is healthy (default: 2).
    pub upgrade_hold_level: u8,
    /// Downgrade timer above which upgrading pauses at the hold level
    /// (default: 5000).
    pub upgrade_hold_downgrade_ticks: u32,
    /// Priority of road jobs seeded while delivering energy (default: 20).
    pub road_priority: i32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            upgrade_min_population: 3,
            upgrade_hold_level: 2,
            upgrade_hold_downgrade_ticks: 5000,
            road_priority: 20,
        }
    }
}

/// Map a world action's outcome to a step outcome, moving toward `target`
/// when out of range.
pub(crate) fn resolve(
    ctx: &mut JobContext<'_>,
    action: &str,
    outcome: ActionOutcome,
    target: Position,
) -> StepOutcome {
    match outcome {
        ActionOutcome::Ok => StepOutcome::Acted,
        ActionOutcome::NotInRange => reposition(ctx, target),
        ActionOutcome::Failed(code) => record(ctx, action, code),
    }
}

/// Step the agent toward `target`.
pub(crate) fn reposition(ctx: &mut JobContext<'_>, target: Position) -> StepOutcome {
    match ctx.world.move_toward(ctx.agent, target) {
        ActionOutcome::Failed(code) => record(ctx, "move", code),
        ActionOutcome::Ok | ActionOutcome::NotInRange => StepOutcome::Moved,
    }
}

/// Write `"<action>: <detail>"` to the agent's error slot.
pub(crate) fn record(ctx: &mut JobContext<'_>, action: &str, detail: impl Display) -> StepOutcome {
    let message = format!("{action}: {detail}");
    debug!(agent = %ctx.agent, error = %message, "Job step failed");
    ctx.memory.error = Some(message);
    StepOutcome::Recorded
}

/// Record that the job's target has disappeared from the world.
pub(crate) fn record_missing(
    ctx: &mut JobContext<'_>,
    action: &str,
    target: impl Display,
) -> StepOutcome {
    record(ctx, action, format_args!("target {target} no longer exists"))
}
