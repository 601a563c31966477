//! Facility assignment loop.
//!
//! Each facility scores a small fixed candidate table every tick and
//! executes the best candidate unconditionally. Candidates are rebuilt per
//! tick and never persisted. Today the table holds a single entry, spawning
//! a worker, so every facility attempts a spawn every tick and the world
//! decides (by energy) whether it happens.

use std::collections::BTreeMap;

use colony_jobs::Configuration;
use colony_types::{AgentId, AgentMemory, ColonyMemory, StructureId};
use colony_world::World;
use tracing::{debug, info, warn};

use crate::tick::Engine;

/// Something a facility can do in a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityTask {
    /// Spawn a new agent from the named profile.
    SpawnWorker {
        /// Profile name.
        profile: String,
    },
}

/// A scored facility action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityCandidate {
    /// The action.
    pub task: FacilityTask,
    /// Higher wins.
    pub priority: i32,
}

/// What the facility loop did this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacilityReport {
    /// Facilities that executed a candidate.
    pub actions: usize,
    /// Agents actually spawned.
    pub spawns: usize,
}

/// The candidate table, in declaration order.
pub fn candidates(engine: &Engine) -> Vec<FacilityCandidate> {
    vec![FacilityCandidate {
        task: FacilityTask::SpawnWorker {
            profile: engine.spawn_profile.clone(),
        },
        priority: engine.priorities.spawn_worker,
    }]
}

/// The highest-priority candidate. Ties go to the earlier entry.
pub fn select(mut table: Vec<FacilityCandidate>) -> Option<FacilityCandidate> {
    table.sort_by_key(|candidate| core::cmp::Reverse(candidate.priority));
    table.into_iter().next()
}

/// Run every facility once.
pub fn run(memory: &mut ColonyMemory, world: &mut dyn World, engine: &Engine) -> FacilityReport {
    let mut report = FacilityReport::default();
    for facility in world.facilities() {
        let Some(choice) = select(candidates(engine)) else {
            continue;
        };
        report.actions = report.actions.saturating_add(1);
        if execute(memory, world, engine, facility, &choice.task) {
            report.spawns = report.spawns.saturating_add(1);
        }
    }
    report
}

fn execute(
    memory: &mut ColonyMemory,
    world: &mut dyn World,
    engine: &Engine,
    facility: StructureId,
    task: &FacilityTask,
) -> bool {
    match task {
        FacilityTask::SpawnWorker { profile } => {
            let Some(configuration) = engine.profiles.get(profile) else {
                warn!(%facility, profile = %profile, "Spawn profile is not registered");
                return false;
            };
            spawn_worker(&mut memory.agents, world, facility, configuration).is_some()
        }
    }
}

/// Spawn one agent of `profile` from `facility` and record its memory.
///
/// Returns the new agent's ID, or `None` if the world refused the spawn.
pub fn spawn_worker(
    agents: &mut BTreeMap<AgentId, AgentMemory>,
    world: &mut dyn World,
    facility: StructureId,
    profile: &Configuration,
) -> Option<AgentId> {
    let agent = AgentId::new();
    let outcome = world.spawn_agent(facility, agent, &profile.body);
    if outcome.is_ok() {
        agents.insert(agent, AgentMemory::new(profile.name.as_str()));
        info!(%agent, %facility, profile = %profile.name, "Spawned worker");
        Some(agent)
    } else {
        debug!(%facility, profile = %profile.name, %outcome, "Spawn failed");
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::Position;
    use colony_world::SimWorld;

    use super::*;

    #[test]
    fn select_prefers_higher_priority_then_earlier() {
        let spawn = |p: &str, priority| FacilityCandidate {
            task: FacilityTask::SpawnWorker {
                profile: p.to_owned(),
            },
            priority,
        };
        let chosen = select(vec![spawn("a", 10), spawn("b", 50), spawn("c", 50)]).unwrap();
        assert_eq!(
            chosen.task,
            FacilityTask::SpawnWorker {
                profile: String::from("b")
            }
        );
        assert!(select(Vec::new()).is_none());
    }

    #[test]
    fn every_facility_attempts_a_spawn() {
        let mut world = SimWorld::new();
        world.add_facility(Position::new(5, 5), 300).unwrap();
        world.add_facility(Position::new(15, 5), 0).unwrap();
        let mut memory = ColonyMemory::default();
        let engine = Engine::default();

        let report = run(&mut memory, &mut world, &engine);
        assert_eq!(report.actions, 2);
        assert_eq!(report.spawns, 1);
        assert_eq!(world.population(), 1);
        assert_eq!(memory.agents.len(), 1);
        let record = memory.agents.values().next().unwrap();
        assert_eq!(record.configuration_name, "basicCreep");
        assert!(record.current_job.is_none());
    }

    #[test]
    fn failed_spawn_writes_no_memory() {
        let mut world = SimWorld::new();
        world.add_facility(Position::new(5, 5), 100).unwrap();
        let mut memory = ColonyMemory::default();

        let report = run(&mut memory, &mut world, &Engine::default());
        assert_eq!(report.actions, 1);
        assert_eq!(report.spawns, 0);
        assert!(memory.agents.is_empty());
    }
}
