//! Worker assignment loop.
//!
//! Every live agent is visited once per tick in ascending ID order. An
//! agent keeps its committed job until the job's continuation check
//! fails; only then does it go back to the queue for a new one.

use colony_jobs::{ActionTable, Configuration, JobContext};
use colony_types::{AgentId, ColonyMemory, Job, JobQueue};
use colony_world::World;
use tracing::{debug, warn};

use crate::tick::Engine;

/// What the worker loop did this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Agents that performed a job step.
    pub worked: usize,
    /// Agents with no committed job and nothing eligible in the queue.
    pub idle: usize,
    /// Agents skipped for missing memory or an unknown profile.
    pub skipped: usize,
    /// Queue entries removed when one-off jobs were dropped.
    pub jobs_retired: usize,
    /// Jobs policies added to the queue while performing.
    pub jobs_enqueued: usize,
}

/// Pick the best job in `queue` for `agent`.
///
/// Jobs are scanned by descending priority, earlier-inserted first among
/// equals. The first job whose kind the profile allows and whose
/// `choose_if` holds is returned.
pub fn select_job(
    queue: &JobQueue,
    world: &dyn World,
    agent: AgentId,
    profile: &Configuration,
    actions: &ActionTable,
) -> Option<Job> {
    queue
        .by_priority()
        .into_iter()
        .find(|job| profile.allows(job.kind()) && actions.choose_if(world, agent, job.task()))
        .copied()
}

/// Visit every live agent once.
pub fn run(memory: &mut ColonyMemory, world: &mut dyn World, engine: &Engine) -> WorkerReport {
    let mut report = WorkerReport::default();
    let ColonyMemory {
        job_queue, agents, ..
    } = memory;

    for agent in world.agents() {
        let Some(record) = agents.get_mut(&agent) else {
            warn!(%agent, "Agent has no memory, skipping");
            report.skipped = report.skipped.saturating_add(1);
            continue;
        };
        let Some(profile) = engine.profiles.get(&record.configuration_name) else {
            let message = format!("unknown configuration: {}", record.configuration_name);
            warn!(%agent, configuration = %record.configuration_name, "Unknown configuration, skipping");
            record.error = Some(message);
            report.skipped = report.skipped.saturating_add(1);
            continue;
        };

        let job = match record.current_job {
            Some(job) => job,
            None => {
                let Some(job) = select_job(job_queue, &*world, agent, profile, &engine.actions)
                else {
                    debug!(%agent, "No eligible job");
                    report.idle = report.idle.saturating_add(1);
                    continue;
                };
                debug!(%agent, task = %job.task(), priority = job.priority(), "Job assigned");
                record.current_job = Some(job);
                job
            }
        };

        let queued_before = job_queue.len();
        let step = {
            let mut ctx = JobContext {
                world: &mut *world,
                agent,
                memory: &mut *record,
                queue: &mut *job_queue,
            };
            engine.actions.perform(&mut ctx, job.task())
        };
        report.jobs_enqueued = report
            .jobs_enqueued
            .saturating_add(job_queue.len().saturating_sub(queued_before));
        report.worked = report.worked.saturating_add(1);

        if !engine.actions.continue_if(&*world, agent, job.task()) {
            record.current_job = None;
            if ActionTable::one_off(job.kind()) {
                let removed = job_queue.remove_matching(job.task());
                report.jobs_retired = report.jobs_retired.saturating_add(removed);
            }
            debug!(%agent, task = %job.task(), ?step, "Job dropped");
        }
    }

    report
}
