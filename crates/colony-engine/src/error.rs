//! Error types for the colony engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the run loop so
//! `main` can propagate with `?`.

/// Top-level error for the colony engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: colony_core::ConfigError,
    },

    /// The starting colony could not be laid out.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: colony_world::WorldError,
    },

    /// The state store could not be opened.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: colony_store::StoreError,
    },

    /// The tick loop stopped on a store failure.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: colony_core::RunnerError,
    },
}
