// Window controller - owns the main window and its periodic tick
//
// This module contains the WindowController which coordinates between:
// - Slint UI (MainWindow)
// - TaskRegistry (background work driving the spinner)
// - LogBridge (log output mirrored into the log panel)
// - The initial data loader
//
// Everything that touches the window runs on the event loop thread. Worker
// threads reach it only through `UiBridge`; the signal handler only flips the
// shared exit flag, which the next tick acts on.

use crate::config::{LoaderConfig, WindowConfig};
use crate::loader;
use crate::logging::{LogBridge, LogBuffer};
use crate::models::{DataRow, DataTree};
use crate::shell::{ShutdownHandle, SpinnerChange, Ticker};
use crate::tasks::{TaskHandle, TaskRegistry};
use crate::ui::bridge::UiBridge;
use anyhow::{Context, Result};
use slint::{ComponentHandle, Model, ModelRc, SharedString, Timer, TimerMode, VecModel};
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex};

// Include the generated Slint code
slint::include_modules!();

/// Owns the main window, tick timer, spinner and log panel
///
/// # Example
/// ```ignore
/// let logging = logging::setup_logging(&config.logging, Level::INFO, false)?;
/// let controller = WindowController::new(&config.window, &config.loader, logging.bridge())?;
/// controller.run()?;  // Blocks until window is closed
/// ```
pub struct WindowController {
    /// The Slint UI window
    ui: MainWindow,

    /// Recurring tick timer; stopped on close
    timer: Rc<Timer>,

    /// Background tasks currently running
    registry: TaskRegistry,

    /// Exit flag shared with the signal handler
    shutdown: ShutdownHandle,

    /// Log bridge this controller attached its sink to
    log_bridge: LogBridge,

    /// Handle of the initial loader, if it could be started
    _loader: Option<TaskHandle>,
}

impl WindowController {
    /// Build the window, start the tick timer and launch the initial loader
    ///
    /// Only a failure to create the window itself is returned; other setup
    /// problems are logged and leave the window in a degraded state.
    pub fn new(
        window_config: &WindowConfig,
        loader_config: &LoaderConfig,
        log_bridge: &LogBridge,
    ) -> Result<Self> {
        // Create the Slint UI
        let ui = MainWindow::new().context("Failed to create Slint UI")?;

        let registry = TaskRegistry::new();
        let shutdown = ShutdownHandle::new();
        let ticker = Ticker::new();
        let timer = Rc::new(Timer::default());

        if let Err(e) = Self::setup_ui(&ui, window_config, log_bridge) {
            tracing::error!("{:#}", e);
            tracing::error!("{:?}", e);
        }

        Self::setup_close_handler(&ui, &timer, &shutdown);
        Self::start_timer(&ui, &timer, window_config, &registry, &shutdown, ticker);

        tracing::info!("System started!");

        let mut controller = Self {
            ui,
            timer,
            registry,
            shutdown,
            log_bridge: log_bridge.clone(),
            _loader: None,
        };
        controller._loader = controller.load_initial_data(loader_config);

        Ok(controller)
    }

    /// Apply window settings and hook up the log panel
    fn setup_ui(ui: &MainWindow, config: &WindowConfig, log_bridge: &LogBridge) -> Result<()> {
        ui.set_window_title(config.title.as_str().into());

        if config.fullscreen {
            ui.window().set_fullscreen(true);
        } else if config.maximized {
            ui.window().set_maximized(true);
        }

        ui.set_log_lines(ModelRc::new(VecModel::<SharedString>::default()));
        ui.set_show_log(config.show_log);

        if config.show_log {
            Self::attach_log_panel(ui, config.log_max_lines, log_bridge)
                .context("Failed to attach log panel")?;
        }

        tracing::debug!("UI configured");
        Ok(())
    }

    /// Mirror log output into the log panel through a bounded buffer
    fn attach_log_panel(ui: &MainWindow, max_lines: usize, log_bridge: &LogBridge) -> Result<()> {
        let buffer = Arc::new(Mutex::new(LogBuffer::new(max_lines)));
        let bridge = UiBridge::new(ui);

        log_bridge.attach(Arc::new(move |line| {
            let lines = {
                let mut buffer = buffer.lock().unwrap_or_else(|p| p.into_inner());
                buffer.push(line);
                buffer.snapshot()
            };
            let _ = bridge.update_ui(move |ui| Self::on_update_log_text(ui, lines));
        }))?;

        Ok(())
    }

    /// Replace the log panel contents and scroll to the newest line
    fn on_update_log_text(ui: &MainWindow, lines: Vec<String>) {
        let model: Vec<SharedString> = lines.into_iter().map(SharedString::from).collect();
        ui.set_log_lines(ModelRc::new(VecModel::from(model)));
        ui.invoke_scroll_log_to_end();
    }

    /// Window close: raise the exit flag, stop ticking and let the window hide
    fn setup_close_handler(ui: &MainWindow, timer: &Rc<Timer>, shutdown: &ShutdownHandle) {
        let timer = Rc::downgrade(timer);
        let shutdown = shutdown.clone();

        ui.window().on_close_requested(move || {
            Self::on_close(&shutdown, &timer);
            slint::CloseRequestResponse::HideWindow
        });
    }

    /// Shared by the close event and the tick's close path
    fn on_close(shutdown: &ShutdownHandle, timer: &Weak<Timer>) {
        if !shutdown.mark_closed() {
            return;
        }
        if let Some(timer) = timer.upgrade() {
            timer.stop();
        }
    }

    fn start_timer(
        ui: &MainWindow,
        timer: &Rc<Timer>,
        config: &WindowConfig,
        registry: &TaskRegistry,
        shutdown: &ShutdownHandle,
        mut ticker: Ticker,
    ) {
        let ui_weak = ui.as_weak();
        let timer_weak = Rc::downgrade(timer);
        let registry = registry.clone();
        let shutdown = shutdown.clone();

        timer.start(TimerMode::Repeated, config.tick_interval(), move || {
            let report = ticker.tick(&registry, &shutdown);

            let Some(ui) = ui_weak.upgrade() else {
                return;
            };

            match report.spinner {
                SpinnerChange::Start => ui.set_busy(true),
                SpinnerChange::Stop => ui.set_busy(false),
                SpinnerChange::Unchanged => {}
            }

            if report.should_close() {
                tracing::debug!("Exit flag set, closing window (tick {})", report.tick);
                Self::on_close(&shutdown, &timer_weak);
                if let Err(e) = ui.hide() {
                    tracing::error!("Failed to hide window: {}", e);
                }
                if let Err(e) = slint::quit_event_loop() {
                    tracing::error!("Failed to quit event loop: {}", e);
                }
            }
        });
    }

    /// Start the background loader that fills the data view
    ///
    /// Returns `None` (after logging) if the loader could not be started.
    pub fn load_initial_data(&self, config: &LoaderConfig) -> Option<TaskHandle> {
        let bridge = UiBridge::new(&self.ui);

        let result = loader::load_initial_data(&self.registry, config.delay(), move |tree| {
            bridge
                .update_ui(move |ui| Self::add_data(ui, &tree))
                .context("Failed to deliver initial data to the window")
        });

        match result {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("{} [load_initial_data]", e);
                None
            }
        }
    }

    /// Append the rows of a data tree to the data view
    fn add_data(ui: &MainWindow, tree: &DataTree) {
        let current = ui.get_data_rows();
        let mut rows: Vec<TreeRow> = current.iter().collect();
        rows.extend(tree.rows().into_iter().map(TreeRow::from));
        ui.set_data_rows(ModelRc::new(VecModel::from(rows)));
    }

    /// Show the window and run the event loop until it closes
    pub fn run(&self) -> Result<(), slint::PlatformError> {
        tracing::info!("Starting GUI event loop");
        self.ui.run()
    }

    /// Cloneable handle to the exit flag, for the signal handler
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }
}

impl Drop for WindowController {
    fn drop(&mut self) {
        self.timer.stop();
        if self.log_bridge.detach() {
            tracing::debug!("Log panel detached");
        }
    }
}

impl From<DataRow> for TreeRow {
    fn from(row: DataRow) -> Self {
        Self {
            key: row.key.into(),
            value: row.value.into(),
            depth: row.depth as i32,
        }
    }
}
