// Logging setup - console, optional rotating file, and the GUI log bridge
//
// The subscriber is built once at startup. Instead of handlers being added
// to and removed from global state later, `setup_logging` hands back a
// `LoggingContext` whose `LogBridge` the window controller attaches to.

pub mod bridge;
pub mod buffer;
pub mod rotation;

pub use bridge::{GuiLogLayer, LogBridge, LogSink, format_gui_line};
pub use buffer::{DEFAULT_LOG_CAPACITY, LogBuffer};
pub use rotation::{LOGS_MAX_COUNT, LOGS_MAX_SIZE, RotatingFileWriter};

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Handle to the installed logging stack
///
/// Must be held for the duration of the program: dropping it flushes and
/// stops the file writer.
#[derive(Debug)]
pub struct LoggingContext {
    bridge: LogBridge,
    _file_guard: Option<WorkerGuard>,
}

impl LoggingContext {
    /// The bridge feeding the window's log panel
    pub fn bridge(&self) -> &LogBridge {
        &self.bridge
    }
}

/// Create the log directory if needed and open the rotating writer
pub fn open_log_file(config: &LoggingConfig) -> Result<RotatingFileWriter> {
    let log_dir = Utf8PathBuf::from(&config.dir);
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let path = log_dir.join(&config.file_name);
    RotatingFileWriter::open(&path, config.max_bytes, config.max_backups)
        .with_context(|| format!("Failed to open log file: {}", path))
}

/// Install the global subscriber
///
/// # Arguments
/// * `config` - File logging location and rotation limits
/// * `console_level` - Most verbose level printed to stderr
/// * `log_to_file` - If true, also log DEBUG and above to the rotating file
///
/// # Returns
/// A [`LoggingContext`] that must be held while the program runs
pub fn setup_logging(
    config: &LoggingConfig,
    console_level: Level,
    log_to_file: bool,
) -> Result<LoggingContext> {
    let bridge = LogBridge::new();

    let (file_layer, file_guard, log_file) = if log_to_file {
        let writer = open_log_file(config)?;
        let path = writer.path().to_path_buf();
        let (non_blocking, guard) = tracing_appender::non_blocking(writer);

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // No ANSI codes in log files
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(LevelFilter::DEBUG);

        (Some(layer), Some(guard), Some(path))
    } else {
        (None, None, None)
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(LevelFilter::from_level(console_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(GuiLogLayer::new(bridge.clone()))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(path) = &log_file {
        tracing::info!("Storing log into '{}'", path);
    }
    tracing::debug!(
        "Logging initialized: console={}, file={}",
        console_level,
        log_to_file
    );

    Ok(LoggingContext {
        bridge,
        _file_guard: file_guard,
    })
}
