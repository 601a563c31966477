//! Tick cycle and orchestration for the colony job engine.
//!
//! # Modules
//!
//! - [`config`] -- `colony-config.yaml` loading, defaults, and validation
//! - [`maintenance`] -- Dead-agent memory collection and extension job upkeep
//! - [`bootstrap`] -- First-tick worker spawn and standing job seeds
//! - [`workers`] -- Job selection, continuation, and retirement per agent
//! - [`facilities`] -- Candidate scoring and spawning per facility
//! - [`tick`] -- The four-phase tick and the [`Engine`] it runs with
//! - [`runner`] -- Async load/tick/persist loop with panic isolation

pub mod bootstrap;
pub mod config;
pub mod facilities;
pub mod maintenance;
pub mod runner;
pub mod tick;
pub mod workers;

// Re-export primary types at crate root.
pub use config::{ColonyConfig, ConfigError, EngineConfig, PriorityConfig, StoreBackend};
pub use runner::{
    NoOpCallback, RunControl, RunEndReason, RunResult, RunnerError, TickCallback, TickFailure,
    log_run_end, run_colony,
};
pub use tick::{Engine, TickError, TickSummary, run_tick};
pub use workers::select_job;
