//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity the engine refers to has a strongly-typed ID so that a
//! source can never be passed where a structure is expected. All IDs use
//! UUID v7 (time-ordered); `Ord` gives agents a tick-stable iteration order
//! inside `BTreeMap`s.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// A fixed identifier, for objects that must keep their ID
            /// across process restarts.
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a worker agent.
    AgentId
}

define_id! {
    /// Unique identifier for a built structure (facilities, extensions).
    StructureId
}

define_id! {
    /// Unique identifier for an energy source.
    SourceId
}

define_id! {
    /// Unique identifier for a room controller.
    ControllerId
}
