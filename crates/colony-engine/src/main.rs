//! Colony engine binary.
//!
//! Wires the starting colony, the configured state store, and the tick
//! loop together, then runs until the tick limit or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `colony-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the engine from configuration
//! 4. Create the starting colony
//! 5. Open the state store
//! 6. Install the Ctrl-C handler
//! 7. Run the tick loop
//! 8. Log the result

mod error;
mod progress;

use std::path::Path;
use std::sync::Arc;

use colony_core::config::StoreConfig;
use colony_core::{ColonyConfig, Engine, RunControl, StoreBackend, runner};
use colony_store::{AnyStore, DragonflyStore, FileStore, MemoryStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "colony-config.yaml";

/// Ticks between progress reports.
const PROGRESS_EVERY: u64 = 100;

/// Application entry point for the colony engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the store fails
/// during the run.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember the source.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("colony-engine starting");
    info!(
        from_file,
        tick_interval_ms = config.engine.tick_interval_ms,
        max_ticks = config.engine.max_ticks,
        spawn_profile = %config.engine.spawn_profile,
        profiles = config.profiles.len(),
        "Configuration loaded"
    );

    // 3. Build the engine.
    let engine = Engine::from_config(&config).map_err(EngineError::from)?;
    info!(profiles = engine.profiles.len(), "Engine assembled");

    // 4. Create the starting colony.
    let (mut world, ids) = colony_world::create_starting_colony().map_err(EngineError::from)?;
    info!(
        facility = %ids.facility,
        controller = %ids.controller,
        structures = world.structure_count(),
        "Starting colony created"
    );

    // 5. Open the state store.
    let store = open_store(&config.store).await?;
    info!(backend = store.backend(), "State store ready");

    // 6. Stop cleanly on Ctrl-C.
    let control = Arc::new(RunControl::new());
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current tick");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    // 7. Run the tick loop.
    let mut callback = ProgressCallback::new(PROGRESS_EVERY);
    let result = runner::run_colony(
        &mut world,
        &store,
        &engine,
        &config.engine,
        &control,
        &mut callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 8. Log results.
    runner::log_run_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "colony-engine shutdown complete"
    );

    Ok(())
}

/// Load `colony-config.yaml`, falling back to defaults if it is absent.
///
/// Returns whether the file was found alongside the configuration.
fn load_config() -> Result<(ColonyConfig, bool), EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok((ColonyConfig::from_file(path)?, true))
    } else {
        let mut config = ColonyConfig::default();
        config.store.apply_env_overrides();
        Ok((config, false))
    }
}

/// Open the backend named in the store configuration.
async fn open_store(config: &StoreConfig) -> Result<AnyStore, EngineError> {
    let store = match config.backend {
        StoreBackend::Memory => AnyStore::from(MemoryStore::new()),
        StoreBackend::File => {
            info!(path = %config.path.display(), "Using file store");
            AnyStore::from(FileStore::new(config.path.clone()))
        }
        StoreBackend::Dragonfly => {
            info!(url = %config.url, "Connecting to Dragonfly");
            AnyStore::from(DragonflyStore::connect(&config.url).await?)
        }
    };
    Ok(store)
}
