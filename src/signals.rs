//! Termination signal handling.
//!
//! SIGINT and SIGTERM are caught by a task on the tokio runtime. The handler
//! never touches UI state directly: it calls [`Killable::kill`] on each
//! registered object (which only sets flags the UI thread polls), marks
//! itself as triggered, and leaves the actual teardown to the event loop.
//! `main` turns a triggered killer into exit status [`SIGNAL_EXIT_CODE`].

use crate::error::ShellError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Process exit status after a signal-triggered shutdown
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// How long the event loop gets to wind down before the listener exits the
/// process itself
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// An object that can be asked to stop from the signal handler
pub trait Killable: Send + Sync {
    /// Name used when logging failures
    fn label(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Request termination; must not block or touch UI-thread state
    fn kill(&self) -> Result<(), ShellError>;
}

/// Calls `kill` on every registered object when a termination signal arrives
pub struct GracefulKiller {
    objects: Vec<Arc<dyn Killable>>,
    triggered: AtomicBool,
}

impl GracefulKiller {
    pub fn new(objects: Vec<Arc<dyn Killable>>) -> Self {
        Self {
            objects,
            triggered: AtomicBool::new(false),
        }
    }

    /// Kill every registered object and return the exit status to use
    ///
    /// A failing `kill` is logged and does not stop the remaining ones.
    pub fn exit_gracefully(&self, signal: &str) -> i32 {
        tracing::warn!(" /!\\ Program Killed! /!\\ ({})", signal);

        for object in &self.objects {
            if let Err(e) = object.kill() {
                tracing::error!("Failed to kill '{}': {}", object.label(), e);
                tracing::error!("{:?}", e);
            }
        }

        self.triggered.store(true, Ordering::SeqCst);
        SIGNAL_EXIT_CODE
    }

    /// Whether a termination signal has been handled
    pub fn was_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Install the signal listener on the given runtime
    ///
    /// After handling a signal the listener waits [`SHUTDOWN_GRACE`] for the
    /// UI to close, then exits the process if it is still running.
    ///
    /// # Errors
    ///
    /// If the signal handlers cannot be registered
    pub fn install(self: Arc<Self>, runtime: &tokio::runtime::Handle) -> std::io::Result<()> {
        self.install_with(runtime, SHUTDOWN_GRACE, |code| {
            tracing::warn!("Event loop did not stop in time, exiting");
            std::process::exit(code);
        })
    }

    /// Install the signal listener with a custom exit action
    ///
    /// Handlers are registered before this returns, so a signal raised
    /// afterwards is never missed. `on_exit` receives the exit status once
    /// `grace` has elapsed after the signal was handled.
    pub fn install_with<F>(
        self: Arc<Self>,
        runtime: &tokio::runtime::Handle,
        grace: Duration,
        on_exit: F,
    ) -> std::io::Result<()>
    where
        F: FnOnce(i32) + Send + 'static,
    {
        let mut signals = {
            let _guard = runtime.enter();
            TerminationSignals::register()?
        };

        runtime.spawn(async move {
            let signal = signals.recv().await;
            let code = self.exit_gracefully(signal);
            tokio::time::sleep(grace).await;
            on_exit(code);
        });

        tracing::debug!("Signal handlers installed");
        Ok(())
    }
}

#[cfg(unix)]
struct TerminationSignals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

#[cfg(not(unix))]
struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> &'static str {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => return "CTRL-C",
                Err(e) => {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}
