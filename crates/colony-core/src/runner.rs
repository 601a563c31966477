//! Colony loop runner.
//!
//! [`run_colony`] drives the tick loop around a store and a simulated
//! world:
//!
//! - **Load**: read the last persisted [`ColonyMemory`] (default if none)
//! - **Tick**: run [`run_tick`] on that working copy, guarded against both
//!   errors and panics
//! - **Persist**: save the working copy only if the tick succeeded
//! - **Advance**: step the world and sleep for the tick interval
//!
//! A failed tick is logged and skipped; the next tick starts from the last
//! good state. Only store failures end the run with an error. Panics are
//! reported with their source location, plus the stack when
//! `RUST_BACKTRACE` enables capture.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use colony_store::{StateStore, StoreError};
use colony_types::ColonyMemory;
use colony_world::Simulation;
use tracing::{error, info, warn};

use crate::config::EngineConfig;
use crate::tick::{self, Engine, TickError, TickSummary};

/// Errors that can occur during the colony run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Loading or saving colony state failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// Why a tick produced no new state.
#[derive(Debug, thiserror::Error)]
pub enum TickFailure {
    /// The tick returned an error.
    #[error(transparent)]
    Error(#[from] TickError),

    /// The tick panicked.
    #[error("tick panicked at {}: {message}", .location.as_deref().unwrap_or("<unknown>"))]
    Panic {
        /// The panic payload.
        message: String,
        /// `file:line:column` of the panic, if the hook saw it.
        location: Option<String>,
        /// Stack at the panic site. `None` unless `RUST_BACKTRACE` is set.
        backtrace: Option<String>,
    },
}

/// Where and how the last panic on this thread happened.
struct PanicSite {
    location: Option<String>,
    backtrace: Option<String>,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook in front of the current one that records the panic site
/// for [`guarded_tick`].
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let backtrace = Backtrace::capture();
            let site = PanicSite {
                location: info.location().map(ToString::to_string),
                backtrace: (backtrace.status() == BacktraceStatus::Captured)
                    .then(|| backtrace.to_string()),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(site));
            previous(info);
        }));
    });
}

/// Reason the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// [`RunControl::request_stop`] was called.
    StopRequested,
}

/// Result of a colony run.
#[derive(Debug)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: RunEndReason,
    /// The last successful tick summary, if any.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks attempted.
    pub total_ticks: u64,
    /// Ticks that failed and were not persisted.
    pub failed_ticks: u64,
}

/// Shared stop switch for the tick loop.
#[derive(Debug, Default)]
pub struct RunControl {
    stop_requested: AtomicBool,
}

impl RunControl {
    /// Create a control with no stop pending.
    pub const fn new() -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
        }
    }

    /// Ask the loop to stop before its next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

/// Callback invoked after each tick.
pub trait TickCallback: Send {
    /// Called after a tick completes and its state has been saved.
    fn on_tick(&mut self, summary: &TickSummary, memory: &ColonyMemory);

    /// Called after a tick fails. Nothing was saved.
    fn on_tick_failed(&mut self, _tick: u64, _failure: &TickFailure) {}
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _memory: &ColonyMemory) {}
}

/// Run one tick on `memory`, converting a panic into a [`TickFailure`].
pub fn guarded_tick<W: Simulation>(
    memory: &mut ColonyMemory,
    world: &mut W,
    engine: &Engine,
) -> Result<TickSummary, TickFailure> {
    install_panic_hook();
    LAST_PANIC.with(|slot| *slot.borrow_mut() = None);

    match catch_unwind(AssertUnwindSafe(|| tick::run_tick(memory, world, engine))) {
        Ok(result) => result.map_err(TickFailure::from),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| String::from("non-string panic payload"));
            let site = LAST_PANIC.with(|slot| slot.borrow_mut().take());
            let (location, backtrace) = site.map_or((None, None), |s| (s.location, s.backtrace));
            Err(TickFailure::Panic {
                message,
                location,
                backtrace,
            })
        }
    }
}

/// Run the colony loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if the store cannot be read or written.
pub async fn run_colony<W, S>(
    world: &mut W,
    store: &S,
    engine: &Engine,
    settings: &EngineConfig,
    control: &RunControl,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, RunnerError>
where
    W: Simulation,
    S: StateStore,
{
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut failed_ticks: u64 = 0;

    info!(
        max_ticks = settings.max_ticks,
        tick_interval_ms = settings.tick_interval_ms,
        start_time = world.time(),
        "Colony starting"
    );

    loop {
        if control.is_stop_requested() {
            info!("Stop requested");
            return Ok(RunResult {
                end_reason: RunEndReason::StopRequested,
                final_summary: last_summary,
                total_ticks,
                failed_ticks,
            });
        }
        if settings.max_ticks > 0 && total_ticks >= settings.max_ticks {
            info!(total_ticks, max_ticks = settings.max_ticks, "Tick limit reached");
            return Ok(RunResult {
                end_reason: RunEndReason::MaxTicksReached,
                final_summary: last_summary,
                total_ticks,
                failed_ticks,
            });
        }

        let tick = world.time();
        let mut working = store.load().await?.unwrap_or_default();

        match guarded_tick(&mut working, world, engine) {
            Ok(summary) => {
                store.save(&working).await?;
                callback.on_tick(&summary, &working);
                last_summary = Some(summary);
            }
            Err(failure) => {
                match &failure {
                    TickFailure::Panic {
                        backtrace: Some(backtrace),
                        ..
                    } => error!(tick, error = %failure, %backtrace, "Tick failed, state not persisted"),
                    _ => error!(tick, error = %failure, "Tick failed, state not persisted"),
                }
                failed_ticks = failed_ticks.saturating_add(1);
                callback.on_tick_failed(tick, &failure);
            }
        }
        total_ticks = total_ticks.saturating_add(1);

        let _ = world.advance();

        if settings.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(settings.tick_interval_ms)).await;
        }
    }
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        failed_ticks = result.failed_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Colony stopped"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            agents_alive = summary.agents_alive,
            queued = summary.queue_len,
            "Final tick summary"
        );
    } else {
        warn!("Colony stopped with no successful ticks");
    }
}
