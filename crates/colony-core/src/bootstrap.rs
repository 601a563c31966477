//! One-time colony bootstrap.
//!
//! On the first tick the colony spawns its first worker and seeds the job
//! queue with the three standing jobs: mine, store, upgrade. The
//! `ran_startup_commands` flag in memory guards against running twice.

use colony_types::{ColonyMemory, Job, Task};
use colony_world::World;
use tracing::{info, warn};

use crate::facilities;
use crate::tick::{Engine, TickError};

/// What bootstrap did this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Whether bootstrap ran (false once the flag is set).
    pub ran: bool,
    /// Whether the first worker was spawned.
    pub spawned: bool,
    /// Seed jobs added to the queue.
    pub jobs_enqueued: usize,
}

/// Run bootstrap unless it has already completed.
///
/// # Errors
///
/// Returns [`TickError::Bootstrap`] if the world lacks a facility, a
/// source, or a controller, and [`TickError::UnknownProfile`] if the spawn
/// profile is not registered. Memory is left untouched in both cases.
pub fn run(
    memory: &mut ColonyMemory,
    world: &mut dyn World,
    engine: &Engine,
) -> Result<BootstrapReport, TickError> {
    if memory.ran_startup_commands {
        return Ok(BootstrapReport::default());
    }

    let facility = world
        .facilities()
        .first()
        .copied()
        .ok_or(TickError::Bootstrap { missing: "facility" })?;
    let source = world
        .sources()
        .first()
        .copied()
        .ok_or(TickError::Bootstrap { missing: "source" })?;
    let controller = world
        .controller()
        .ok_or(TickError::Bootstrap {
            missing: "controller",
        })?;
    let profile = engine
        .profiles
        .get(&engine.spawn_profile)
        .ok_or_else(|| TickError::UnknownProfile(engine.spawn_profile.clone()))?;

    let spawned = facilities::spawn_worker(&mut memory.agents, world, facility, profile).is_some();
    if !spawned {
        warn!(%facility, "Bootstrap could not spawn the first worker");
    }

    let seeds = [
        Job::new(Task::mine_energy(source), engine.priorities.mine_energy),
        Job::new(Task::store_energy(facility), engine.priorities.store_energy),
        Job::new(
            Task::upgrade_controller(controller),
            engine.priorities.upgrade_controller,
        ),
    ];
    for job in seeds {
        memory.job_queue.push(job);
    }
    memory.ran_startup_commands = true;

    info!(
        %facility,
        %source,
        %controller,
        spawned,
        "Colony bootstrapped"
    );

    Ok(BootstrapReport {
        ran: true,
        spawned,
        jobs_enqueued: seeds.len(),
    })
}
