//! Persisted colony state.
//!
//! [`ColonyMemory`] is everything the engine keeps between ticks. It is
//! read from the state store at tick start and written back at tick end,
//! and must round-trip exactly.
//!
//! # Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `ranStartupCommands` | Whether bootstrap has run |
//! | `jobQueue` | Ordered jobs, each `{type, <payload>, priority}` |
//! | `agents.{id}.configurationName` | Capability profile name |
//! | `agents.{id}.error` | Last recorded action failure, if any |
//! | `agents.{id}.currentJob` | Committed job, if any |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;
use crate::job::{Job, JobQueue};

/// Per-agent persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMemory {
    /// Name of the capability profile the agent was spawned with.
    pub configuration_name: String,
    /// Last diagnostic from a failed world action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The job the agent is committed to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job: Option<Job>,
}

impl AgentMemory {
    /// A fresh record for an agent of the given profile.
    pub fn new(configuration_name: impl Into<String>) -> Self {
        Self {
            configuration_name: configuration_name.into(),
            error: None,
            current_job: None,
        }
    }
}

/// All state the engine persists across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonyMemory {
    /// Set once bootstrap has completed.
    #[serde(default)]
    pub ran_startup_commands: bool,
    /// The shared job queue.
    #[serde(default)]
    pub job_queue: JobQueue,
    /// Per-agent records keyed by agent ID.
    #[serde(default)]
    pub agents: BTreeMap<AgentId, AgentMemory>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ids::{SourceId, StructureId};
    use crate::job::Task;
    use crate::position::Position;

    #[test]
    fn memory_roundtrips_through_json() {
        let mut memory = ColonyMemory {
            ran_startup_commands: true,
            ..ColonyMemory::default()
        };
        memory
            .job_queue
            .push(Job::new(Task::mine_energy(SourceId::new()), 30));
        memory
            .job_queue
            .push(Job::new(Task::store_energy(StructureId::new()), 40));
        memory
            .job_queue
            .push(Job::new(Task::build_structure(Position::new(7, 9)), 20));

        let mut worker = AgentMemory::new("basicCreep");
        worker.error = Some(String::from("harvest: not enough energy"));
        worker.current_job = memory.job_queue.iter().next().copied();
        memory.agents.insert(AgentId::new(), worker);
        memory.agents.insert(AgentId::new(), AgentMemory::new("basicCreep"));

        let json = serde_json::to_string(&memory).unwrap();
        let restored: ColonyMemory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, memory);
    }

    #[test]
    fn uses_camel_case_keys() {
        let mut memory = ColonyMemory::default();
        let mut record = AgentMemory::new("basicCreep");
        record.current_job = Some(Job::new(Task::build_structure(Position::new(1, 1)), 80));
        memory.agents.insert(AgentId::new(), record);

        let value = serde_json::to_value(&memory).unwrap();
        assert!(value.get("ranStartupCommands").is_some());
        assert!(value.get("jobQueue").is_some());
        let agent = value
            .get("agents")
            .and_then(|a| a.as_object())
            .and_then(|a| a.values().next())
            .unwrap();
        assert_eq!(agent.get("configurationName").unwrap(), "basicCreep");
        assert!(agent.get("currentJob").is_some());
        assert!(agent.get("error").is_none());
    }

    #[test]
    fn empty_document_loads_as_default() {
        let restored: ColonyMemory = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, ColonyMemory::default());
    }
}
