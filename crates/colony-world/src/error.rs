//! Error types for the `colony-world` crate.
//!
//! World *actions* never fail with an error: they report an
//! [`ActionOutcome`](colony_types::ActionOutcome). [`WorldError`] covers
//! building and editing a [`SimWorld`](crate::SimWorld) layout.

use colony_types::{AgentId, Position, StructureId};

/// Errors that can occur while constructing or editing a world layout.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A structure, source, or controller already occupies the tile.
    #[error("tile {0} is already occupied")]
    TileOccupied(Position),

    /// A construction site already exists on the tile.
    #[error("construction site already exists at {0}")]
    DuplicateSite(Position),

    /// An object with this ID already exists.
    #[error("id already in use: {0}")]
    DuplicateId(String),

    /// The room already has a controller.
    #[error("room already has a controller")]
    DuplicateController,

    /// The agent does not exist.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// The structure does not exist.
    #[error("structure not found: {0}")]
    StructureNotFound(StructureId),

    /// A stored amount would exceed the holder's capacity.
    #[error("amount {amount} exceeds capacity {capacity}")]
    ExceedsCapacity {
        /// The requested amount.
        amount: u32,
        /// The holder's capacity.
        capacity: u32,
    },

    /// An agent body must contain at least one part.
    #[error("agent body is empty")]
    EmptyBody,
}
