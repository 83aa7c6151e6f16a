use thiserror::Error;

/// Errors raised by the shell's library components.
///
/// Application-level setup code wraps these in `anyhow` with context; the
/// components themselves report through this enum.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Task '{0}' is already running")]
    TaskAlreadyRunning(String),

    #[error("A log sink is already attached to the bridge")]
    SinkAlreadyAttached,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("UI event loop is not available: {0}")]
    EventLoop(#[from] slint::EventLoopError),

    #[error("Kill failed for '{0}'")]
    Kill(String),
}
