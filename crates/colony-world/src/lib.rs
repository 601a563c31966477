//! The world collaborator for the colony job engine.
//!
//! The engine reads and mutates the game world only through the [`World`]
//! trait. This crate defines that boundary and ships [`SimWorld`], a small
//! deterministic room simulation used by the engine binary and by tests.
//!
//! # Modules
//!
//! - [`api`] -- The [`World`] and [`Simulation`] traits plus the read-only
//!   views they return.
//! - [`error`] -- Error types for building world layouts.
//! - [`sim`] -- [`SimWorld`]: agents, sources, structures, a controller,
//!   and construction sites on a single grid.
//! - [`starting_colony`] -- The default starting room.

pub mod api;
pub mod error;
pub mod sim;
pub mod starting_colony;

// Re-export primary types at crate root.
pub use api::{
    ADJACENT_RANGE, ConstructionSite, ControllerStatus, Simulation, WORK_RANGE, World,
};
pub use error::WorldError;
pub use sim::{SimAgent, SimWorld, construction_cost};
pub use starting_colony::{StartingColonyIds, create_starting_colony};
