//! The collaborator boundary between the job engine and the world.
//!
//! The engine never owns physics. It queries the world through [`World`]
//! and issues domain actions that each report an [`ActionOutcome`]. All
//! lookups return `Option`: a referenced entity may disappear between
//! ticks (a source is removed, an agent expires), and callers decide what
//! a missing entity means for them.

use colony_types::{
    ActionOutcome, AgentId, BodyPart, ControllerId, Position, SourceId, StructureId,
    StructureKind,
};

/// Action range for harvesting and transferring.
pub const ADJACENT_RANGE: u32 = 1;

/// Action range for building and upgrading.
pub const WORK_RANGE: u32 = 3;

/// A pending construction site as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructionSite {
    /// Where the structure will stand.
    pub position: Position,
    /// What it will become.
    pub kind: StructureKind,
    /// Energy already invested.
    pub progress: u32,
    /// Energy required to complete.
    pub progress_total: u32,
}

/// Observable state of a room controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerStatus {
    /// Current controller level.
    pub level: u8,
    /// Progress toward the next level.
    pub progress: u32,
    /// Ticks until the controller loses a level without upgrades.
    pub ticks_to_downgrade: u32,
}

/// Queries and domain actions the engine consumes.
///
/// Enumerations return IDs in ascending order so that iteration is stable
/// within a tick.
pub trait World {
    /// The current game time.
    fn time(&self) -> u64;

    /// Live agents, in ascending ID order.
    fn agents(&self) -> Vec<AgentId>;

    /// Number of live agents.
    fn population(&self) -> usize {
        self.agents().len()
    }

    /// Facilities able to spawn agents, in ascending ID order.
    fn facilities(&self) -> Vec<StructureId>;

    /// Energy sources, in ascending ID order.
    fn sources(&self) -> Vec<SourceId>;

    /// The room controller, if the room has one.
    fn controller(&self) -> Option<ControllerId>;

    /// Every pending construction site.
    fn construction_sites(&self) -> Vec<ConstructionSite>;

    /// The construction site on `position`, if any.
    fn construction_site_at(&self, position: Position) -> Option<ConstructionSite>;

    /// Where the agent stands.
    fn agent_position(&self, agent: AgentId) -> Option<Position>;

    /// Energy the agent carries.
    fn agent_energy(&self, agent: AgentId) -> Option<u32>;

    /// Additional energy the agent could carry.
    fn agent_free_capacity(&self, agent: AgentId) -> Option<u32>;

    /// Additional energy the structure could store.
    fn structure_free_capacity(&self, structure: StructureId) -> Option<u32>;

    /// Current state of a controller.
    fn controller_status(&self, controller: ControllerId) -> Option<ControllerStatus>;

    /// Where a source is.
    fn source_position(&self, source: SourceId) -> Option<Position>;

    /// Where a structure is.
    fn structure_position(&self, structure: StructureId) -> Option<Position>;

    /// Where a controller is.
    fn controller_position(&self, controller: ControllerId) -> Option<Position>;

    /// Harvest energy from a source into the agent.
    fn harvest(&mut self, agent: AgentId, source: SourceId) -> ActionOutcome;

    /// Move carried energy into a structure.
    fn transfer_energy(&mut self, agent: AgentId, target: StructureId) -> ActionOutcome;

    /// Spend carried energy on a controller.
    fn upgrade_controller(&mut self, agent: AgentId, controller: ControllerId) -> ActionOutcome;

    /// Spend carried energy on the construction site at `position`.
    fn build(&mut self, agent: AgentId, position: Position) -> ActionOutcome;

    /// Order the agent one step toward `target`.
    fn move_toward(&mut self, agent: AgentId, target: Position) -> ActionOutcome;

    /// Place a construction site.
    fn create_construction_site(&mut self, position: Position, kind: StructureKind)
    -> ActionOutcome;

    /// Spawn a new agent with the given ID and body from a facility.
    fn spawn_agent(&mut self, facility: StructureId, agent: AgentId, body: &[BodyPart])
    -> ActionOutcome;
}

/// A world that can be stepped forward between engine ticks.
///
/// The engine itself never calls this; the runner does, after the tick's
/// state has been persisted.
pub trait Simulation: World {
    /// Advance world time by one tick and return the new time.
    fn advance(&mut self) -> u64;
}
