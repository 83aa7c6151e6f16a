// spinshell - Minimal desktop shell with a background loader and live log panel
//
// This is the library crate containing the shell's components.
// The binary crate (main.rs) wires them together and runs the event loop.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod shell;
pub mod signals;
pub mod tasks;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::{ConfigSource, ShellConfig};
pub use error::ShellError;
pub use models::DataTree;
pub use shell::{ShellPhase, ShutdownHandle, Ticker};
pub use signals::{GracefulKiller, Killable, SIGNAL_EXIT_CODE};
pub use tasks::{TaskHandle, TaskId, TaskRegistry};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
