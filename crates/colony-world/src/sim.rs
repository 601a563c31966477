//! In-memory, single-room grid world.
//!
//! [`SimWorld`] implements [`World`] with deliberately simple physics:
//! actions resolve immediately, movement is one greedy step per order with
//! no collision handling, and every quantity uses saturating arithmetic.
//! Sources refill every [`SOURCE_REGEN_TICKS`] and facilities trickle back
//! toward full, so an idle colony still grows slowly.
//! It exists so the engine can be driven end-to-end without a game server.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{
    ActionOutcome, AgentId, BodyPart, ControllerId, ErrorCode, Position, SourceId, StructureId,
    StructureKind,
};
use tracing::debug;

use crate::api::{
    ADJACENT_RANGE, ConstructionSite, ControllerStatus, Simulation, WORK_RANGE, World,
};
use crate::error::WorldError;

/// Energy one `Carry` part holds.
pub const CARRY_CAPACITY_PER_PART: u32 = 50;

/// Energy harvested per `Work` part per action.
pub const HARVEST_PER_WORK: u32 = 2;

/// Build progress per `Work` part per action.
pub const BUILD_PER_WORK: u32 = 5;

/// Controller progress per `Work` part per action.
pub const UPGRADE_PER_WORK: u32 = 1;

/// Energy a source holds when full.
pub const SOURCE_CAPACITY: u32 = 3000;

/// Ticks between source refills.
pub const SOURCE_REGEN_TICKS: u64 = 300;

/// Ticks an agent lives after spawning.
pub const AGENT_LIFETIME: u32 = 1500;

/// Energy a spawning facility stores.
pub const FACILITY_CAPACITY: u32 = 300;

/// Energy a facility regains each tick while below capacity.
pub const FACILITY_REGEN_PER_TICK: u32 = 1;

/// Energy an extension stores.
pub const EXTENSION_CAPACITY: u32 = 50;

/// Energy needed to complete a construction site of `kind`.
pub const fn construction_cost(kind: StructureKind) -> u32 {
    match kind {
        StructureKind::Road => 300,
        StructureKind::Extension => 3000,
    }
}

/// Progress needed to leave `level`, or `None` at the maximum level.
const fn level_progress(level: u8) -> Option<u32> {
    match level {
        1 => Some(200),
        2 => Some(45_000),
        3 => Some(135_000),
        4 => Some(405_000),
        5 => Some(1_215_000),
        6 => Some(3_645_000),
        7 => Some(10_935_000),
        _ => None,
    }
}

/// Downgrade timer restored at `level` whenever the controller is upgraded.
const fn downgrade_ticks(level: u8) -> u32 {
    match level {
        0 | 1 => 20_000,
        2 => 10_000,
        3 => 20_000,
        4 => 40_000,
        5 => 80_000,
        6 => 120_000,
        7 => 150_000,
        _ => 200_000,
    }
}

fn count_parts(body: &[BodyPart], part: BodyPart) -> u32 {
    u32::try_from(body.iter().filter(|p| **p == part).count()).unwrap_or(u32::MAX)
}

/// A worker agent in the simulated room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimAgent {
    /// Current tile.
    pub position: Position,
    /// Physical build.
    pub body: Vec<BodyPart>,
    /// Carried energy.
    pub energy: u32,
    /// Remaining lifetime in ticks.
    pub ticks_to_live: u32,
}

impl SimAgent {
    /// Total energy this agent can carry.
    pub fn capacity(&self) -> u32 {
        count_parts(&self.body, BodyPart::Carry).saturating_mul(CARRY_CAPACITY_PER_PART)
    }

    fn free_capacity(&self) -> u32 {
        self.capacity().saturating_sub(self.energy)
    }

    fn work_parts(&self) -> u32 {
        count_parts(&self.body, BodyPart::Work)
    }
}

/// An energy source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSource {
    /// Tile of the source.
    pub position: Position,
    /// Energy left until the next refill.
    pub energy: u32,
}

/// The role of a built structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStructureRole {
    /// Spawns agents; counts as a facility.
    Facility,
    /// Stores energy only.
    Extension,
}

/// A built structure that stores energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimStructure {
    /// Tile of the structure.
    pub position: Position,
    /// What the structure does.
    pub role: SimStructureRole,
    /// Stored energy.
    pub energy: u32,
    /// Maximum stored energy.
    pub capacity: u32,
}

/// The room controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimController {
    /// Tile of the controller.
    pub position: Position,
    /// Current level.
    pub level: u8,
    /// Progress toward the next level.
    pub progress: u32,
    /// Ticks until downgrade.
    pub ticks_to_downgrade: u32,
}

/// A single simulated room.
#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    time: u64,
    agents: BTreeMap<AgentId, SimAgent>,
    sources: BTreeMap<SourceId, SimSource>,
    structures: BTreeMap<StructureId, SimStructure>,
    controller: Option<(ControllerId, SimController)>,
    sites: BTreeMap<Position, ConstructionSite>,
    roads: BTreeSet<Position>,
}

impl SimWorld {
    /// Create an empty room at time 0.
    pub const fn new() -> Self {
        Self {
            time: 0,
            agents: BTreeMap::new(),
            sources: BTreeMap::new(),
            structures: BTreeMap::new(),
            controller: None,
            sites: BTreeMap::new(),
            roads: BTreeSet::new(),
        }
    }

    // -------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------

    fn tile_blocked(&self, position: Position) -> bool {
        self.sources.values().any(|s| s.position == position)
            || self.structures.values().any(|s| s.position == position)
            || self
                .controller
                .as_ref()
                .is_some_and(|(_, c)| c.position == position)
    }

    /// Add a full energy source.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] if the tile holds another object.
    pub fn add_source(&mut self, position: Position) -> Result<SourceId, WorldError> {
        self.add_source_as(SourceId::new(), position)
    }

    /// Add a full energy source under a caller-chosen ID.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] if the tile holds another object,
    /// or [`WorldError::DuplicateId`] if the ID is taken.
    pub fn add_source_as(&mut self, id: SourceId, position: Position) -> Result<SourceId, WorldError> {
        if self.tile_blocked(position) {
            return Err(WorldError::TileOccupied(position));
        }
        if self.sources.contains_key(&id) {
            return Err(WorldError::DuplicateId(id.to_string()));
        }
        self.sources.insert(
            id,
            SimSource {
                position,
                energy: SOURCE_CAPACITY,
            },
        );
        Ok(id)
    }

    /// Add a spawning facility holding `energy`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] if the tile holds another object,
    /// or [`WorldError::ExceedsCapacity`] if `energy` is above
    /// [`FACILITY_CAPACITY`].
    pub fn add_facility(&mut self, position: Position, energy: u32) -> Result<StructureId, WorldError> {
        self.add_facility_as(StructureId::new(), position, energy)
    }

    /// Add a spawning facility under a caller-chosen ID.
    ///
    /// # Errors
    ///
    /// As [`add_facility`](Self::add_facility), plus
    /// [`WorldError::DuplicateId`] if the ID is taken.
    pub fn add_facility_as(
        &mut self,
        id: StructureId,
        position: Position,
        energy: u32,
    ) -> Result<StructureId, WorldError> {
        self.add_structure(id, position, SimStructureRole::Facility, FACILITY_CAPACITY, energy)
    }

    /// Add an empty extension.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] if the tile holds another object.
    pub fn add_extension(&mut self, position: Position) -> Result<StructureId, WorldError> {
        self.add_structure(
            StructureId::new(),
            position,
            SimStructureRole::Extension,
            EXTENSION_CAPACITY,
            0,
        )
    }

    fn add_structure(
        &mut self,
        id: StructureId,
        position: Position,
        role: SimStructureRole,
        capacity: u32,
        energy: u32,
    ) -> Result<StructureId, WorldError> {
        if self.tile_blocked(position) {
            return Err(WorldError::TileOccupied(position));
        }
        if self.structures.contains_key(&id) {
            return Err(WorldError::DuplicateId(id.to_string()));
        }
        if energy > capacity {
            return Err(WorldError::ExceedsCapacity {
                amount: energy,
                capacity,
            });
        }
        self.structures.insert(
            id,
            SimStructure {
                position,
                role,
                energy,
                capacity,
            },
        );
        Ok(id)
    }

    /// Place the room controller.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateController`] if one exists, or
    /// [`WorldError::TileOccupied`] if the tile holds another object.
    pub fn set_controller(&mut self, position: Position, level: u8) -> Result<ControllerId, WorldError> {
        self.set_controller_as(ControllerId::new(), position, level)
    }

    /// Place the room controller under a caller-chosen ID.
    ///
    /// # Errors
    ///
    /// As [`set_controller`](Self::set_controller).
    pub fn set_controller_as(
        &mut self,
        id: ControllerId,
        position: Position,
        level: u8,
    ) -> Result<ControllerId, WorldError> {
        if self.controller.is_some() {
            return Err(WorldError::DuplicateController);
        }
        if self.tile_blocked(position) {
            return Err(WorldError::TileOccupied(position));
        }
        self.controller = Some((
            id,
            SimController {
                position,
                level,
                progress: 0,
                ticks_to_downgrade: downgrade_ticks(level),
            },
        ));
        Ok(id)
    }

    /// Place a construction site directly, as a room planner would.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateSite`] if a site already exists there.
    pub fn add_construction_site(&mut self, position: Position, kind: StructureKind) -> Result<(), WorldError> {
        if self.sites.contains_key(&position) {
            return Err(WorldError::DuplicateSite(position));
        }
        self.sites.insert(position, new_site(position, kind));
        Ok(())
    }

    /// Place an agent directly, bypassing any facility.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyBody`] if `body` has no parts.
    pub fn add_agent(&mut self, position: Position, body: &[BodyPart]) -> Result<AgentId, WorldError> {
        if body.is_empty() {
            return Err(WorldError::EmptyBody);
        }
        let id = AgentId::new();
        self.agents.insert(id, new_agent(position, body));
        Ok(id)
    }

    /// Remove an agent, as if it died.
    pub fn remove_agent(&mut self, agent: AgentId) -> bool {
        self.agents.remove(&agent).is_some()
    }

    /// Remove a source, as if it were destroyed.
    pub fn remove_source(&mut self, source: SourceId) -> bool {
        self.sources.remove(&source).is_some()
    }

    /// Set how much energy an agent carries.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] or
    /// [`WorldError::ExceedsCapacity`].
    pub fn set_agent_energy(&mut self, agent: AgentId, energy: u32) -> Result<(), WorldError> {
        let state = self
            .agents
            .get_mut(&agent)
            .ok_or(WorldError::AgentNotFound(agent))?;
        let capacity = state.capacity();
        if energy > capacity {
            return Err(WorldError::ExceedsCapacity {
                amount: energy,
                capacity,
            });
        }
        state.energy = energy;
        Ok(())
    }

    /// Set how much energy a structure stores.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::StructureNotFound`] or
    /// [`WorldError::ExceedsCapacity`].
    pub fn set_structure_energy(&mut self, structure: StructureId, energy: u32) -> Result<(), WorldError> {
        let state = self
            .structures
            .get_mut(&structure)
            .ok_or(WorldError::StructureNotFound(structure))?;
        if energy > state.capacity {
            return Err(WorldError::ExceedsCapacity {
                amount: energy,
                capacity: state.capacity,
            });
        }
        state.energy = energy;
        Ok(())
    }

    /// Override the controller's level and downgrade timer.
    pub const fn set_controller_state(&mut self, level: u8, ticks_to_downgrade: u32) {
        if let Some((_, controller)) = self.controller.as_mut() {
            controller.level = level;
            controller.ticks_to_downgrade = ticks_to_downgrade;
        }
    }

    // -------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------

    /// Look up an agent.
    pub fn agent(&self, agent: AgentId) -> Option<&SimAgent> {
        self.agents.get(&agent)
    }

    /// Look up a structure.
    pub fn structure(&self, structure: StructureId) -> Option<&SimStructure> {
        self.structures.get(&structure)
    }

    /// Whether a finished road lies on `position`.
    pub fn has_road(&self, position: Position) -> bool {
        self.roads.contains(&position)
    }

    /// Number of built structures, facilities included.
    pub fn structure_count(&self) -> usize {
        self.structures.len()
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn complete_site(&mut self, site: ConstructionSite) {
        match site.kind {
            StructureKind::Road => {
                self.roads.insert(site.position);
            }
            StructureKind::Extension => {
                let id = StructureId::new();
                self.structures.insert(
                    id,
                    SimStructure {
                        position: site.position,
                        role: SimStructureRole::Extension,
                        energy: 0,
                        capacity: EXTENSION_CAPACITY,
                    },
                );
            }
        }
        debug!(position = %site.position, kind = ?site.kind, "Construction completed");
    }
}

fn new_site(position: Position, kind: StructureKind) -> ConstructionSite {
    ConstructionSite {
        position,
        kind,
        progress: 0,
        progress_total: construction_cost(kind),
    }
}

fn new_agent(position: Position, body: &[BodyPart]) -> SimAgent {
    SimAgent {
        position,
        body: body.to_vec(),
        energy: 0,
        ticks_to_live: AGENT_LIFETIME,
    }
}

impl World for SimWorld {
    fn time(&self) -> u64 {
        self.time
    }

    fn agents(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    fn population(&self) -> usize {
        self.agents.len()
    }

    fn facilities(&self) -> Vec<StructureId> {
        self.structures
            .iter()
            .filter(|(_, s)| s.role == SimStructureRole::Facility)
            .map(|(id, _)| *id)
            .collect()
    }

    fn sources(&self) -> Vec<SourceId> {
        self.sources.keys().copied().collect()
    }

    fn controller(&self) -> Option<ControllerId> {
        self.controller.as_ref().map(|(id, _)| *id)
    }

    fn construction_sites(&self) -> Vec<ConstructionSite> {
        self.sites.values().copied().collect()
    }

    fn construction_site_at(&self, position: Position) -> Option<ConstructionSite> {
        self.sites.get(&position).copied()
    }

    fn agent_position(&self, agent: AgentId) -> Option<Position> {
        self.agents.get(&agent).map(|a| a.position)
    }

    fn agent_energy(&self, agent: AgentId) -> Option<u32> {
        self.agents.get(&agent).map(|a| a.energy)
    }

    fn agent_free_capacity(&self, agent: AgentId) -> Option<u32> {
        self.agents.get(&agent).map(SimAgent::free_capacity)
    }

    fn structure_free_capacity(&self, structure: StructureId) -> Option<u32> {
        self.structures
            .get(&structure)
            .map(|s| s.capacity.saturating_sub(s.energy))
    }

    fn controller_status(&self, controller: ControllerId) -> Option<ControllerStatus> {
        self.controller
            .as_ref()
            .filter(|(id, _)| *id == controller)
            .map(|(_, c)| ControllerStatus {
                level: c.level,
                progress: c.progress,
                ticks_to_downgrade: c.ticks_to_downgrade,
            })
    }

    fn source_position(&self, source: SourceId) -> Option<Position> {
        self.sources.get(&source).map(|s| s.position)
    }

    fn structure_position(&self, structure: StructureId) -> Option<Position> {
        self.structures.get(&structure).map(|s| s.position)
    }

    fn controller_position(&self, controller: ControllerId) -> Option<Position> {
        self.controller
            .as_ref()
            .filter(|(id, _)| *id == controller)
            .map(|(_, c)| c.position)
    }

    fn harvest(&mut self, agent: AgentId, source: SourceId) -> ActionOutcome {
        let Some(worker) = self.agents.get_mut(&agent) else {
            return ActionOutcome::Failed(ErrorCode::NotFound);
        };
        let Some(node) = self.sources.get_mut(&source) else {
            return ActionOutcome::Failed(ErrorCode::InvalidTarget);
        };
        let work = worker.work_parts();
        if work == 0 {
            return ActionOutcome::Failed(ErrorCode::NoBodyPart);
        }
        if !worker.position.in_range_to(node.position, ADJACENT_RANGE) {
            return ActionOutcome::NotInRange;
        }
        if node.energy == 0 {
            return ActionOutcome::Failed(ErrorCode::NotEnoughEnergy);
        }
        let free = worker.free_capacity();
        if free == 0 {
            return ActionOutcome::Failed(ErrorCode::Full);
        }
        let amount = work
            .saturating_mul(HARVEST_PER_WORK)
            .min(node.energy)
            .min(free);
        node.energy = node.energy.saturating_sub(amount);
        worker.energy = worker.energy.saturating_add(amount);
        ActionOutcome::Ok
    }

    fn transfer_energy(&mut self, agent: AgentId, target: StructureId) -> ActionOutcome {
        let Some(worker) = self.agents.get_mut(&agent) else {
            return ActionOutcome::Failed(ErrorCode::NotFound);
        };
        let Some(structure) = self.structures.get_mut(&target) else {
            return ActionOutcome::Failed(ErrorCode::InvalidTarget);
        };
        if worker.energy == 0 {
            return ActionOutcome::Failed(ErrorCode::NotEnoughEnergy);
        }
        if !worker.position.in_range_to(structure.position, ADJACENT_RANGE) {
            return ActionOutcome::NotInRange;
        }
        let free = structure.capacity.saturating_sub(structure.energy);
        if free == 0 {
            return ActionOutcome::Failed(ErrorCode::Full);
        }
        let amount = worker.energy.min(free);
        worker.energy = worker.energy.saturating_sub(amount);
        structure.energy = structure.energy.saturating_add(amount);
        ActionOutcome::Ok
    }

    fn upgrade_controller(&mut self, agent: AgentId, controller: ControllerId) -> ActionOutcome {
        let Some(worker) = self.agents.get_mut(&agent) else {
            return ActionOutcome::Failed(ErrorCode::NotFound);
        };
        let Some((_, state)) = self.controller.as_mut().filter(|(id, _)| *id == controller) else {
            return ActionOutcome::Failed(ErrorCode::InvalidTarget);
        };
        let work = worker.work_parts();
        if work == 0 {
            return ActionOutcome::Failed(ErrorCode::NoBodyPart);
        }
        if worker.energy == 0 {
            return ActionOutcome::Failed(ErrorCode::NotEnoughEnergy);
        }
        if !worker.position.in_range_to(state.position, WORK_RANGE) {
            return ActionOutcome::NotInRange;
        }
        let amount = work.saturating_mul(UPGRADE_PER_WORK).min(worker.energy);
        worker.energy = worker.energy.saturating_sub(amount);
        state.progress = state.progress.saturating_add(amount);
        if let Some(needed) = level_progress(state.level) {
            if state.progress >= needed {
                state.progress = state.progress.saturating_sub(needed);
                state.level = state.level.saturating_add(1);
                debug!(level = state.level, "Controller levelled up");
            }
        }
        state.ticks_to_downgrade = downgrade_ticks(state.level);
        ActionOutcome::Ok
    }

    fn build(&mut self, agent: AgentId, position: Position) -> ActionOutcome {
        let Some(worker) = self.agents.get_mut(&agent) else {
            return ActionOutcome::Failed(ErrorCode::NotFound);
        };
        let Some(site) = self.sites.get_mut(&position) else {
            return ActionOutcome::Failed(ErrorCode::InvalidTarget);
        };
        let work = worker.work_parts();
        if work == 0 {
            return ActionOutcome::Failed(ErrorCode::NoBodyPart);
        }
        if worker.energy == 0 {
            return ActionOutcome::Failed(ErrorCode::NotEnoughEnergy);
        }
        if !worker.position.in_range_to(position, WORK_RANGE) {
            return ActionOutcome::NotInRange;
        }
        let remaining = site.progress_total.saturating_sub(site.progress);
        let amount = work
            .saturating_mul(BUILD_PER_WORK)
            .min(worker.energy)
            .min(remaining);
        worker.energy = worker.energy.saturating_sub(amount);
        site.progress = site.progress.saturating_add(amount);
        if site.progress >= site.progress_total {
            if let Some(done) = self.sites.remove(&position) {
                self.complete_site(done);
            }
        }
        ActionOutcome::Ok
    }

    fn move_toward(&mut self, agent: AgentId, target: Position) -> ActionOutcome {
        let Some(worker) = self.agents.get_mut(&agent) else {
            return ActionOutcome::Failed(ErrorCode::NotFound);
        };
        if count_parts(&worker.body, BodyPart::Move) == 0 {
            return ActionOutcome::Failed(ErrorCode::NoBodyPart);
        }
        worker.position = worker.position.step_toward(target);
        ActionOutcome::Ok
    }

    fn create_construction_site(
        &mut self,
        position: Position,
        kind: StructureKind,
    ) -> ActionOutcome {
        if self.sites.contains_key(&position) || self.tile_blocked(position) {
            return ActionOutcome::Failed(ErrorCode::InvalidTarget);
        }
        if kind == StructureKind::Road && self.roads.contains(&position) {
            return ActionOutcome::Failed(ErrorCode::InvalidTarget);
        }
        self.sites.insert(position, new_site(position, kind));
        ActionOutcome::Ok
    }

    fn spawn_agent(
        &mut self,
        facility: StructureId,
        agent: AgentId,
        body: &[BodyPart],
    ) -> ActionOutcome {
        if body.is_empty() {
            return ActionOutcome::Failed(ErrorCode::InvalidArgs);
        }
        if self.agents.contains_key(&agent) {
            return ActionOutcome::Failed(ErrorCode::InvalidArgs);
        }
        let Some(structure) = self
            .structures
            .get_mut(&facility)
            .filter(|s| s.role == SimStructureRole::Facility)
        else {
            return ActionOutcome::Failed(ErrorCode::NotFound);
        };
        let cost = BodyPart::body_cost(body);
        if structure.energy < cost {
            return ActionOutcome::Failed(ErrorCode::NotEnoughEnergy);
        }
        structure.energy = structure.energy.saturating_sub(cost);
        let position = Position::new(structure.position.x, structure.position.y.saturating_add(1));
        self.agents.insert(agent, new_agent(position, body));
        debug!(%agent, %facility, cost, "Agent spawned");
        ActionOutcome::Ok
    }
}

impl Simulation for SimWorld {
    fn advance(&mut self) -> u64 {
        self.time = self.time.saturating_add(1);

        self.agents.retain(|id, agent| {
            agent.ticks_to_live = agent.ticks_to_live.saturating_sub(1);
            let alive = agent.ticks_to_live > 0;
            if !alive {
                debug!(agent = %id, "Agent expired");
            }
            alive
        });

        if self.time.checked_rem(SOURCE_REGEN_TICKS) == Some(0) {
            for source in self.sources.values_mut() {
                source.energy = SOURCE_CAPACITY;
            }
        }

        for structure in self.structures.values_mut() {
            if structure.role == SimStructureRole::Facility {
                structure.energy = structure
                    .energy
                    .saturating_add(FACILITY_REGEN_PER_TICK)
                    .min(structure.capacity);
            }
        }

        if let Some((_, controller)) = self.controller.as_mut() {
            controller.ticks_to_downgrade = controller.ticks_to_downgrade.saturating_sub(1);
            if controller.ticks_to_downgrade == 0 && controller.level > 1 {
                controller.level = controller.level.saturating_sub(1);
                controller.progress = 0;
                controller.ticks_to_downgrade = downgrade_ticks(controller.level);
            }
        }

        self.time
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const WORKER: [BodyPart; 4] = [BodyPart::Work, BodyPart::Carry, BodyPart::Move, BodyPart::Move];

    fn room() -> (SimWorld, SourceId, StructureId, ControllerId) {
        let mut world = SimWorld::new();
        let source = world.add_source(Position::new(10, 10)).unwrap();
        let facility = world.add_facility(Position::new(20, 20), 300).unwrap();
        let controller = world.set_controller(Position::new(30, 30), 1).unwrap();
        (world, source, facility, controller)
    }

    #[test]
    fn harvest_requires_adjacency() {
        let (mut world, source, _, _) = room();
        let agent = world.add_agent(Position::new(13, 10), &WORKER).unwrap();
        assert_eq!(world.harvest(agent, source), ActionOutcome::NotInRange);

        let _ = world.move_toward(agent, Position::new(10, 10));
        let _ = world.move_toward(agent, Position::new(10, 10));
        assert_eq!(world.agent_position(agent), Some(Position::new(11, 10)));
        assert_eq!(world.harvest(agent, source), ActionOutcome::Ok);
        assert_eq!(world.agent_energy(agent), Some(HARVEST_PER_WORK));
    }

    #[test]
    fn harvest_when_full_fails() {
        let (mut world, source, _, _) = room();
        let agent = world.add_agent(Position::new(11, 11), &WORKER).unwrap();
        world.set_agent_energy(agent, 50).unwrap();
        assert_eq!(world.agent_free_capacity(agent), Some(0));
        assert_eq!(
            world.harvest(agent, source),
            ActionOutcome::Failed(ErrorCode::Full)
        );
    }

    #[test]
    fn transfer_fills_facility() {
        let (mut world, _, facility, _) = room();
        world.set_structure_energy(facility, 280).unwrap();
        let agent = world.add_agent(Position::new(21, 21), &WORKER).unwrap();
        world.set_agent_energy(agent, 50).unwrap();

        assert_eq!(world.transfer_energy(agent, facility), ActionOutcome::Ok);
        assert_eq!(world.agent_energy(agent), Some(30));
        assert_eq!(world.structure_free_capacity(facility), Some(0));
        assert_eq!(
            world.transfer_energy(agent, facility),
            ActionOutcome::Failed(ErrorCode::Full)
        );
    }

    #[test]
    fn upgrade_levels_controller() {
        let (mut world, _, _, controller) = room();
        let agent = world.add_agent(Position::new(28, 28), &WORKER).unwrap();
        for _ in 0..200 {
            world.set_agent_energy(agent, 1).unwrap();
            assert_eq!(world.upgrade_controller(agent, controller), ActionOutcome::Ok);
        }
        let status = world.controller_status(controller).unwrap();
        assert_eq!(status.level, 2);
        assert_eq!(status.ticks_to_downgrade, 10_000);
    }

    #[test]
    fn building_a_road_completes_site() {
        let (mut world, _, _, _) = room();
        let spot = Position::new(5, 5);
        assert_eq!(
            world.create_construction_site(spot, StructureKind::Road),
            ActionOutcome::Ok
        );
        assert_eq!(
            world.create_construction_site(spot, StructureKind::Road),
            ActionOutcome::Failed(ErrorCode::InvalidTarget)
        );

        let agent = world.add_agent(Position::new(6, 6), &WORKER).unwrap();
        for _ in 0..60 {
            world.set_agent_energy(agent, 50).unwrap();
            let _ = world.build(agent, spot);
        }
        assert!(world.construction_site_at(spot).is_none());
        assert!(world.has_road(spot));
        assert_eq!(
            world.create_construction_site(spot, StructureKind::Road),
            ActionOutcome::Failed(ErrorCode::InvalidTarget)
        );
    }

    #[test]
    fn completed_extension_becomes_structure() {
        let (mut world, _, _, _) = room();
        let spot = Position::new(22, 20);
        world.add_construction_site(spot, StructureKind::Extension).unwrap();
        let agent = world.add_agent(Position::new(22, 21), &WORKER).unwrap();
        let before = world.structure_count();
        for _ in 0..600 {
            world.set_agent_energy(agent, 50).unwrap();
            let _ = world.build(agent, spot);
        }
        assert_eq!(world.structure_count(), before + 1);
        assert!(world.construction_sites().is_empty());
    }

    #[test]
    fn spawn_charges_facility_energy() {
        let (mut world, _, facility, _) = room();
        let id = AgentId::new();
        assert_eq!(world.spawn_agent(facility, id, &WORKER), ActionOutcome::Ok);
        assert_eq!(world.structure(facility).unwrap().energy, 50);
        assert_eq!(world.agent_position(id), Some(Position::new(20, 21)));
        assert_eq!(
            world.spawn_agent(facility, AgentId::new(), &WORKER),
            ActionOutcome::Failed(ErrorCode::NotEnoughEnergy)
        );
    }

    #[test]
    fn agents_expire_after_lifetime() {
        let (mut world, _, _, _) = room();
        let agent = world.add_agent(Position::new(1, 1), &WORKER).unwrap();
        for _ in 1..AGENT_LIFETIME {
            let _ = world.advance();
        }
        assert_eq!(world.population(), 1);
        let _ = world.advance();
        assert!(world.agent_position(agent).is_none());
        assert_eq!(world.population(), 0);
    }

    #[test]
    fn facilities_regenerate_energy() {
        let (mut world, _, facility, _) = room();
        world.set_structure_energy(facility, 298).unwrap();
        let _ = world.advance();
        assert_eq!(world.structure(facility).unwrap().energy, 299);
        let _ = world.advance();
        let _ = world.advance();
        assert_eq!(world.structure(facility).unwrap().energy, 300);
    }

    #[test]
    fn layout_rejects_occupied_tiles() {
        let (mut world, _, _, _) = room();
        assert!(matches!(
            world.add_source(Position::new(20, 20)),
            Err(WorldError::TileOccupied(_))
        ));
        assert!(matches!(
            world.set_controller(Position::new(1, 1), 1),
            Err(WorldError::DuplicateController)
        ));
    }

    #[test]
    fn fixed_ids_are_kept_and_not_reused() {
        let mut world = SimWorld::new();
        let id = SourceId::from_u128(42);
        assert_eq!(world.add_source_as(id, Position::new(3, 3)).unwrap(), id);
        assert_eq!(world.source_position(id), Some(Position::new(3, 3)));
        assert!(matches!(
            world.add_source_as(id, Position::new(4, 4)),
            Err(WorldError::DuplicateId(_))
        ));

        let facility = StructureId::from_u128(7);
        world.add_facility_as(facility, Position::new(9, 9), 0).unwrap();
        assert!(matches!(
            world.add_facility_as(facility, Position::new(10, 10), 0),
            Err(WorldError::DuplicateId(_))
        ));
    }

    #[test]
    fn every_failure_code_has_a_cause() {
        let (mut world, source, facility, _) = room();
        let ghost = AgentId::new();
        assert_eq!(
            world.harvest(ghost, source),
            ActionOutcome::Failed(ErrorCode::NotFound)
        );
        assert_eq!(
            world.spawn_agent(facility, AgentId::new(), &[]),
            ActionOutcome::Failed(ErrorCode::InvalidArgs)
        );
        let source_tile = world.source_position(source).unwrap();
        assert_eq!(
            world.create_construction_site(source_tile, StructureKind::Road),
            ActionOutcome::Failed(ErrorCode::InvalidTarget)
        );
        let stuck = world.add_agent(Position::new(2, 2), &[BodyPart::Work]).unwrap();
        assert_eq!(
            world.move_toward(stuck, Position::new(5, 5)),
            ActionOutcome::Failed(ErrorCode::NoBodyPart)
        );
    }
}
