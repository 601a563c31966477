//! Tick cycle: the four-phase engine pass run once per game tick.
//!
//! 1. **Maintain** -- drop memory of dead agents, queue builds for new
//!    extension sites.
//! 2. **Bootstrap** -- on the very first tick only, spawn the first worker
//!    and seed the standing jobs.
//! 3. **Assign workers** -- every agent continues or picks a job and
//!    performs one step of it.
//! 4. **Assign facilities** -- every facility executes its best candidate.
//!
//! The pass is synchronous and single-threaded. All persisted state lives
//! in the [`ColonyMemory`] passed in; persisting it is the caller's job.

use colony_jobs::{ActionTable, ProfileRegistry};
use colony_types::ColonyMemory;
use colony_world::World;
use tracing::{debug, info};

use crate::config::{ColonyConfig, ConfigError, PriorityConfig};
use crate::{bootstrap, facilities, maintenance, workers};

/// Errors that abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Bootstrap found the world missing a prerequisite.
    #[error("bootstrap requires a {missing}, but the world has none")]
    Bootstrap {
        /// What was missing.
        missing: &'static str,
    },

    /// The spawn profile is not in the registry.
    #[error("spawn profile not registered: {0}")]
    UnknownProfile(String),
}

/// Everything a tick needs besides state: policies, profiles, priorities.
#[derive(Debug, Clone)]
pub struct Engine {
    /// Per-kind job policies.
    pub actions: ActionTable,
    /// Capability profiles by name.
    pub profiles: ProfileRegistry,
    /// Priorities of engine-created jobs and facility candidates.
    pub priorities: PriorityConfig,
    /// Profile used for spawning workers.
    pub spawn_profile: String,
}

impl Engine {
    /// Build an engine from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the declared profiles are inconsistent.
    pub fn from_config(config: &ColonyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            actions: ActionTable::new(&config.policy_config()),
            profiles: config.profile_registry()?,
            priorities: config.priorities,
            spawn_profile: config.engine.spawn_profile.clone(),
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            actions: ActionTable::default(),
            profiles: ProfileRegistry::default(),
            priorities: PriorityConfig::default(),
            spawn_profile: colony_jobs::BASIC_CREEP.to_owned(),
        }
    }
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// World time during the tick.
    pub tick: u64,
    /// Live agents at the start of worker assignment.
    pub agents_alive: usize,
    /// Agents that performed a job step.
    pub agents_worked: usize,
    /// Agents with nothing to do.
    pub agents_idle: usize,
    /// Agents skipped for missing memory or an unknown profile.
    pub agents_skipped: usize,
    /// Queue entries removed by one-off retirement.
    pub jobs_retired: usize,
    /// Jobs added by maintenance, bootstrap, and policies.
    pub jobs_enqueued: usize,
    /// Dead agents' records garbage-collected.
    pub records_collected: usize,
    /// Facilities that executed a candidate.
    pub facility_actions: usize,
    /// Agents spawned by facilities and bootstrap.
    pub spawns: usize,
    /// Whether bootstrap ran this tick.
    pub bootstrapped: bool,
    /// Queue length at the end of the tick.
    pub queue_len: usize,
}

/// Execute one tick against `memory` and `world`.
///
/// # Errors
///
/// Returns [`TickError`] if bootstrap cannot run. `memory` may have been
/// partially updated by maintenance at that point, so callers must not
/// persist it.
pub fn run_tick(
    memory: &mut ColonyMemory,
    world: &mut dyn World,
    engine: &Engine,
) -> Result<TickSummary, TickError> {
    let tick = world.time();
    debug!(tick, queued = memory.job_queue.len(), "Tick starting");

    // --- Phase 1: Maintain ---
    let upkeep = maintenance::run(memory, &*world, engine.priorities.extension);

    // --- Phase 2: Bootstrap ---
    let boot = bootstrap::run(memory, world, engine)?;

    // --- Phase 3: Assign workers ---
    let agents_alive = world.population();
    let work = workers::run(memory, world, engine);

    // --- Phase 4: Assign facilities ---
    let plant = facilities::run(memory, world, engine);

    let summary = TickSummary {
        tick,
        agents_alive,
        agents_worked: work.worked,
        agents_idle: work.idle,
        agents_skipped: work.skipped,
        jobs_retired: work.jobs_retired,
        jobs_enqueued: upkeep
            .jobs_enqueued
            .saturating_add(boot.jobs_enqueued)
            .saturating_add(work.jobs_enqueued),
        records_collected: upkeep.records_collected,
        facility_actions: plant.actions,
        spawns: plant.spawns.saturating_add(usize::from(boot.spawned)),
        bootstrapped: boot.ran,
        queue_len: memory.job_queue.len(),
    };

    info!(
        tick,
        agents = summary.agents_alive,
        worked = summary.agents_worked,
        idle = summary.agents_idle,
        spawns = summary.spawns,
        queued = summary.queue_len,
        "Tick complete"
    );

    Ok(summary)
}
