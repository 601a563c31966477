//! Default starting room for the colony engine.
//!
//! One spawning facility with enough energy for a single worker, two
//! energy sources, a level-1 controller, and two extension sites laid out
//! next to the facility.
//!
//! Every object in the layout has a fixed ID, so a colony state persisted
//! by one run still refers to the same sources, facility, and controller
//! when the room is rebuilt on restart.

use colony_types::{ControllerId, Position, SourceId, StructureId, StructureKind};

use crate::error::WorldError;
use crate::sim::SimWorld;

/// Tile of the starting facility.
pub const FACILITY_POSITION: Position = Position::new(25, 25);

/// Energy the starting facility holds.
pub const FACILITY_ENERGY: u32 = 300;

/// ID of the starting facility.
pub const FACILITY_ID: StructureId = StructureId::from_u128(0x0001);

/// ID of the source nearest the facility.
pub const NEAR_SOURCE_ID: SourceId = SourceId::from_u128(0x0101);

/// ID of the far source.
pub const FAR_SOURCE_ID: SourceId = SourceId::from_u128(0x0102);

/// ID of the room controller.
pub const CONTROLLER_ID: ControllerId = ControllerId::from_u128(0x0201);

/// Identifiers of the starting room's objects, returned alongside the world
/// so callers can reference them directly.
#[derive(Debug, Clone, Copy)]
pub struct StartingColonyIds {
    /// The first spawning facility.
    pub facility: StructureId,
    /// Source nearest the facility.
    pub near_source: SourceId,
    /// Source at the far corner of the room.
    pub far_source: SourceId,
    /// The room controller.
    pub controller: ControllerId,
}

/// Create the default starting room.
///
/// # Errors
///
/// Returns [`WorldError`] if the layout is inconsistent (overlapping tiles).
pub fn create_starting_colony() -> Result<(SimWorld, StartingColonyIds), WorldError> {
    let mut world = SimWorld::new();

    let facility = world.add_facility_as(FACILITY_ID, FACILITY_POSITION, FACILITY_ENERGY)?;
    let near_source = world.add_source_as(NEAR_SOURCE_ID, Position::new(10, 12))?;
    let far_source = world.add_source_as(FAR_SOURCE_ID, Position::new(38, 40))?;
    let controller = world.set_controller_as(CONTROLLER_ID, Position::new(30, 10), 1)?;

    world.add_construction_site(Position::new(27, 25), StructureKind::Extension)?;
    world.add_construction_site(Position::new(27, 26), StructureKind::Extension)?;

    Ok((
        world,
        StartingColonyIds {
            facility,
            near_source,
            far_source,
            controller,
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::World;

    #[test]
    fn starting_colony_has_expected_layout() {
        let (world, ids) = create_starting_colony().unwrap();
        assert_eq!(world.time(), 0);
        assert_eq!(world.population(), 0);
        assert_eq!(world.facilities(), vec![ids.facility]);
        assert_eq!(world.sources().len(), 2);
        assert_eq!(world.controller(), Some(ids.controller));
        assert_eq!(world.controller_status(ids.controller).unwrap().level, 1);
        assert_eq!(world.construction_sites().len(), 2);
        assert_eq!(
            world.structure_free_capacity(ids.facility),
            Some(0)
        );
    }

    #[test]
    fn rebuilt_colony_keeps_its_ids() {
        let (first, a) = create_starting_colony().unwrap();
        let (second, b) = create_starting_colony().unwrap();
        assert_eq!(a.facility, b.facility);
        assert_eq!(a.near_source, b.near_source);
        assert_eq!(a.far_source, b.far_source);
        assert_eq!(a.controller, b.controller);
        assert_eq!(first.sources(), second.sources());
        assert_eq!(a.near_source, NEAR_SOURCE_ID);
    }
}
