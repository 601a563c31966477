//! Persistence for the colony job engine.
//!
//! The engine reads one [`ColonyMemory`] document at the start of each tick
//! and writes it back at the end. Backends differ only in where that
//! document lives.
//!
//! # Modules
//!
//! - [`store`] -- The [`StateStore`] trait and the in-process [`MemoryStore`]
//! - [`file`] -- [`FileStore`], an atomically replaced JSON file
//! - [`dragonfly`] -- [`DragonflyStore`], a single key in `Dragonfly`
//! - [`any`] -- [`AnyStore`], a backend chosen at runtime
//! - [`error`] -- Shared error types
//!
//! [`ColonyMemory`]: colony_types::ColonyMemory

pub mod any;
pub mod dragonfly;
pub mod error;
pub mod file;
pub mod store;

// Re-export primary types for convenience.
pub use any::AnyStore;
pub use dragonfly::{DragonflyStore, MEMORY_KEY};
pub use error::StoreError;
pub use file::FileStore;
pub use store::{MemoryStore, StateStore};
