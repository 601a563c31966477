//! Job descriptors and the shared job queue.
//!
//! A [`Job`] is a [`Task`] (the tagged work descriptor) plus a fixed
//! priority. Two jobs describe the same work when their tasks are equal;
//! the queue removes and de-duplicates by task, never by identity.
//!
//! The persisted form flattens the task next to the priority:
//!
//! ```text
//! {"type": "BuildStructure", "position": {"x": 3, "y": 4}, "priority": 20}
//! ```

use serde::{Deserialize, Serialize};

use crate::enums::JobKind;
use crate::ids::{ControllerId, SourceId, StructureId};
use crate::position::Position;

/// Payload of a [`Task::MineEnergy`] job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MineEnergy {
    /// The source to harvest.
    pub source: SourceId,
}

/// Payload of a [`Task::StoreEnergy`] job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreEnergy {
    /// The structure receiving the energy.
    pub target: StructureId,
}

/// Payload of a [`Task::UpgradeController`] job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeController {
    /// The controller to upgrade.
    pub controller: ControllerId,
}

/// Payload of a [`Task::BuildStructure`] job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildStructure {
    /// Position of the construction site.
    pub position: Position,
}

/// A unit of work: job type plus its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Task {
    /// Harvest energy from a source.
    MineEnergy(MineEnergy),
    /// Deliver carried energy to a structure.
    StoreEnergy(StoreEnergy),
    /// Upgrade the room controller.
    UpgradeController(UpgradeController),
    /// Build the construction site at a position.
    BuildStructure(BuildStructure),
}

impl Task {
    /// The job type of this task.
    pub const fn kind(&self) -> JobKind {
        match self {
            Self::MineEnergy(_) => JobKind::MineEnergy,
            Self::StoreEnergy(_) => JobKind::StoreEnergy,
            Self::UpgradeController(_) => JobKind::UpgradeController,
            Self::BuildStructure(_) => JobKind::BuildStructure,
        }
    }

    /// Shorthand for a [`Task::MineEnergy`].
    pub const fn mine_energy(source: SourceId) -> Self {
        Self::MineEnergy(MineEnergy { source })
    }

    /// Shorthand for a [`Task::StoreEnergy`].
    pub const fn store_energy(target: StructureId) -> Self {
        Self::StoreEnergy(StoreEnergy { target })
    }

    /// Shorthand for a [`Task::UpgradeController`].
    pub const fn upgrade_controller(controller: ControllerId) -> Self {
        Self::UpgradeController(UpgradeController { controller })
    }

    /// Shorthand for a [`Task::BuildStructure`].
    pub const fn build_structure(position: Position) -> Self {
        Self::BuildStructure(BuildStructure { position })
    }
}

impl core::fmt::Display for Task {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MineEnergy(job) => write!(f, "MineEnergy(source {})", job.source),
            Self::StoreEnergy(job) => write!(f, "StoreEnergy(target {})", job.target),
            Self::UpgradeController(job) => {
                write!(f, "UpgradeController(controller {})", job.controller)
            }
            Self::BuildStructure(job) => write!(f, "BuildStructure(at {})", job.position),
        }
    }
}

/// A queued task with its priority.
///
/// The priority is fixed at construction; there is no setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Job {
    #[serde(flatten)]
    task: Task,
    priority: i32,
}

impl Job {
    /// Create a job. Higher priorities are more urgent.
    pub const fn new(task: Task, priority: i32) -> Self {
        Self { task, priority }
    }

    /// The work this job describes.
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// The job type.
    pub const fn kind(&self) -> JobKind {
        self.task.kind()
    }

    /// The job's priority.
    pub const fn priority(&self) -> i32 {
        self.priority
    }
}

/// The ordered, unbounded, persisted job queue.
///
/// Mutated only by appending ([`push`](Self::push)) and by removing every
/// entry whose task matches ([`remove_matching`](Self::remove_matching)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobQueue {
    jobs: Vec<Job>,
}

impl JobQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Append a job to the end of the queue.
    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Remove every job whose task equals `task`, returning how many went.
    ///
    /// All structurally equal duplicates are removed, not just the first.
    pub fn remove_matching(&mut self, task: &Task) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.task() != task);
        before.saturating_sub(self.jobs.len())
    }

    /// Whether any queued job has exactly this task.
    pub fn contains_task(&self, task: &Task) -> bool {
        self.jobs.iter().any(|job| job.task() == task)
    }

    /// Jobs in queue order.
    pub fn iter(&self) -> core::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Jobs sorted by descending priority.
    ///
    /// The sort is stable: among equal priorities, earlier-inserted jobs
    /// come first.
    pub fn by_priority(&self) -> Vec<&Job> {
        let mut sorted: Vec<&Job> = self.jobs.iter().collect();
        sorted.sort_by_key(|job| core::cmp::Reverse(job.priority()));
        sorted
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl FromIterator<Job> for JobQueue {
    fn from_iter<I: IntoIterator<Item = Job>>(iter: I) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a JobQueue {
    type Item = &'a Job;
    type IntoIter = core::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
