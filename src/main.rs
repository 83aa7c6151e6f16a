//! spinshell - Minimal desktop shell
//!
//! Main entry point for the GUI application.
//!
//! # Overview
//!
//! This binary wires the library components together:
//! - Command line flags ([`Cli`])
//! - Logging (console, optional rotating file, GUI log panel)
//! - A small tokio runtime hosting the termination signal listener
//! - The window controller ([`WindowController`]), which starts the
//!   background data loader
//!
//! # Execution Flow
//!
//! 1. Parse flags
//! 2. Resolve `--config` against the launch directory, then change
//!    directory to the installation directory
//! 3. Load configuration (only if `--config` is given)
//! 4. Initialize logging and report where the configuration came from
//! 5. Create the window controller (spawns the loader thread)
//! 6. Install the SIGINT/SIGTERM handler
//! 7. Run the Slint event loop (blocks until the window closes)
//! 8. Exit with 0, or -1 after a signal-triggered shutdown

use anyhow::{Context, Result};
use clap::Parser;
use spinshell::cli::Cli;
use spinshell::ui::WindowController;
use spinshell::{APP_NAME, GracefulKiller, Killable, SIGNAL_EXIT_CODE, ShellConfig, VERSION};
use std::sync::Arc;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            eprintln!("Error: {:?}", e);
            1
        }
    };

    std::process::exit(code);
}

/// Run the application and return the process exit status
fn run(cli: Cli) -> Result<i32> {
    let launch_dir = spinshell::config::current_dir()?;
    let config_path = cli.config_path(&launch_dir);
    let install_dir = spinshell::config::enter_install_dir()?;

    let (mut config, config_source) = ShellConfig::load_with_source(config_path.as_deref())?;
    cli.apply_overrides(&mut config);

    let logging =
        spinshell::logging::setup_logging(&config.logging, cli.console_level(), cli.log_to_file())?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::debug!("Working directory: {}", install_dir);
    config_source.report();

    // Runtime for the signal listener only; the UI runs on the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .thread_name("spinshell-signals")
        .build()
        .context("Failed to create tokio runtime")?;

    let controller = WindowController::new(&config.window, &config.loader, logging.bridge())?;

    let killables: Vec<Arc<dyn Killable>> = vec![Arc::new(controller.shutdown_handle())];
    let killer = Arc::new(GracefulKiller::new(killables));
    if let Err(e) = Arc::clone(&killer).install(runtime.handle()) {
        tracing::error!("Failed to install signal handlers: {}", e);
    }

    // Blocks until the window is closed
    let result = controller.run();

    tracing::info!("GUI closed, shutting down");

    // Detaches the log panel before the window goes away
    drop(controller);

    runtime.shutdown_timeout(Duration::from_secs(1));

    if killer.was_triggered() {
        return Ok(SIGNAL_EXIT_CODE);
    }

    result.context("GUI error")?;
    Ok(0)
}
