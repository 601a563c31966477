//! Shared type definitions for the colony job engine.
//!
//! This crate is the single source of truth for the data the engine passes
//! between crates and persists between ticks.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents, structures, sources, controllers
//! - [`enums`] -- Job kinds, body parts, structure kinds, world action outcomes
//! - [`position`] -- Room tile coordinates and range arithmetic
//! - [`job`] -- Tasks, prioritized jobs, and the shared [`JobQueue`]
//! - [`memory`] -- The persisted colony state schema

pub mod enums;
pub mod ids;
pub mod job;
pub mod memory;
pub mod position;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionOutcome, BodyPart, ErrorCode, JobKind, StructureKind};
pub use ids::{AgentId, ControllerId, SourceId, StructureId};
pub use job::{
    BuildStructure, Job, JobQueue, MineEnergy, StoreEnergy, Task, UpgradeController,
};
pub use memory::{AgentMemory, ColonyMemory};
pub use position::Position;
