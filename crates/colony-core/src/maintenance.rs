//! Queue maintenance, run first in every tick.
//!
//! Drops the memory of agents that no longer exist and queues a build job
//! for every extension construction site that does not have one yet.

use std::collections::BTreeSet;

use colony_types::{AgentId, ColonyMemory, Job, StructureKind, Task};
use colony_world::World;
use tracing::debug;

/// What maintenance changed this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// Agent records removed because the agent is gone.
    pub records_collected: usize,
    /// Extension build jobs added to the queue.
    pub jobs_enqueued: usize,
}

/// Run maintenance against the current world.
pub fn run(memory: &mut ColonyMemory, world: &dyn World, extension_priority: i32) -> MaintenanceReport {
    MaintenanceReport {
        records_collected: collect_dead_records(memory, world),
        jobs_enqueued: queue_extension_sites(memory, world, extension_priority),
    }
}

fn collect_dead_records(memory: &mut ColonyMemory, world: &dyn World) -> usize {
    let live: BTreeSet<AgentId> = world.agents().into_iter().collect();
    let before = memory.agents.len();
    memory.agents.retain(|id, _| {
        let alive = live.contains(id);
        if !alive {
            debug!(agent = %id, "Collected memory of dead agent");
        }
        alive
    });
    before.saturating_sub(memory.agents.len())
}

fn queue_extension_sites(memory: &mut ColonyMemory, world: &dyn World, priority: i32) -> usize {
    let mut enqueued: usize = 0;
    for site in world.construction_sites() {
        if site.kind != StructureKind::Extension {
            continue;
        }
        let task = Task::build_structure(site.position);
        if memory.job_queue.contains_task(&task) {
            continue;
        }
        memory.job_queue.push(Job::new(task, priority));
        debug!(position = %site.position, priority, "Queued extension build");
        enqueued = enqueued.saturating_add(1);
    }
    enqueued
}
