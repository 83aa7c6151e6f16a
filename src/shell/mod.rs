// Tick state - display-free core of the window controller's periodic tick
//
// The controller owns a `Ticker` and a `ShutdownHandle`; each timer firing
// calls `Ticker::tick` and applies the returned report to the Slint window.

use crate::error::ShellError;
use crate::signals::Killable;
use crate::tasks::TaskRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Phase of the window controller as seen by the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPhase {
    /// No background task registered
    Idle,
    /// At least one background task registered
    Loading,
    /// Exit requested; terminal
    Closing,
}

impl ShellPhase {
    /// Compute the next phase from the current one and the tick inputs
    pub fn next(self, registry_empty: bool, exit_requested: bool) -> Self {
        match self {
            ShellPhase::Closing => ShellPhase::Closing,
            _ if exit_requested => ShellPhase::Closing,
            _ if registry_empty => ShellPhase::Idle,
            _ => ShellPhase::Loading,
        }
    }
}

/// Change the UI must apply to the spinner after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerChange {
    Start,
    Stop,
    Unchanged,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub phase: ShellPhase,
    pub spinner: SpinnerChange,
    pub spinning: bool,
    pub reaped: usize,
}

impl TickReport {
    pub fn should_close(&self) -> bool {
        self.phase == ShellPhase::Closing
    }
}

/// Periodic maintenance state
#[derive(Debug)]
pub struct Ticker {
    counter: u64,
    phase: ShellPhase,
    spinning: bool,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            counter: 0,
            phase: ShellPhase::Idle,
            spinning: false,
        }
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn tick_count(&self) -> u64 {
        self.counter
    }

    /// Run one tick: reap dead tasks, derive the spinner, check the exit flag
    pub fn tick(&mut self, registry: &TaskRegistry, shutdown: &ShutdownHandle) -> TickReport {
        self.counter += 1;

        let reaped = registry.reap_finished();
        let busy = !registry.is_empty();

        let spinner = match (busy, self.spinning) {
            (true, false) => SpinnerChange::Start,
            (false, true) => SpinnerChange::Stop,
            _ => SpinnerChange::Unchanged,
        };
        self.spinning = busy;

        let next = self.phase.next(!busy, shutdown.is_exit_requested());
        if next != self.phase {
            tracing::debug!("Shell phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }

        TickReport {
            tick: self.counter,
            phase: self.phase,
            spinner,
            spinning: self.spinning,
            reaped,
        }
    }
}

/// Shared exit flag of the window controller
///
/// Safe to use from any thread: it only flips an atomic, and the UI thread
/// acts on it during the next tick.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    exit_now: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the window to close on the next tick
    pub fn request_shutdown(&self) {
        tracing::debug!("Shutdown requested");
        self.exit_now.store(true, Ordering::SeqCst);
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_now.load(Ordering::SeqCst)
    }

    /// Record that the window is closing, whichever path closed it
    ///
    /// Raises the exit flag as well. Returns `true` only for the first call,
    /// so the farewell is logged once even if both the close event and the
    /// tick get here.
    pub fn mark_closed(&self) -> bool {
        self.exit_now.store(true, Ordering::SeqCst);
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::debug!("Bye, World!");
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Killable for ShutdownHandle {
    fn label(&self) -> &str {
        "main window"
    }

    fn kill(&self) -> Result<(), ShellError> {
        self.exit_now.store(true, Ordering::SeqCst);
        Ok(())
    }
}
