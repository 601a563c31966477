//! Job behaviour and worker capabilities for the colony job engine.
//!
//! # Modules
//!
//! - [`action`] -- The [`JobAction`] trait and the [`ActionTable`] that
//!   dispatches on a job's task.
//! - [`policies`] -- One policy per job kind, plus their tunables.
//! - [`profile`] -- Capability profiles and the [`ProfileRegistry`].
//! - [`error`] -- Profile registry errors.

pub mod action;
pub mod error;
pub mod policies;
pub mod profile;

pub use action::{ActionTable, JobAction, JobContext, StepOutcome};
pub use error::ProfileError;
pub use policies::{BuildPolicy, MinePolicy, PolicyConfig, StorePolicy, UpgradePolicy};
pub use profile::{BASIC_CREEP, Configuration, ProfileRegistry};
