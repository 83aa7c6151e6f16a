// UiBridge - marshals UI updates from worker threads onto the Slint event loop
//
// Slint components are single-threaded: only the event loop thread may touch
// them. Worker threads (the data loader, the log sink) hold a `UiBridge`
// instead and queue closures that run on the event loop thread.

use crate::error::ShellError;
use slint::{ComponentHandle, Weak};

/// Cloneable, `Send` handle for scheduling UI updates from any thread
///
/// # Example
/// ```ignore
/// let ui = MainWindow::new()?;
/// let bridge = UiBridge::new(&ui);
///
/// std::thread::spawn(move || {
///     bridge.update_ui(|ui| ui.set_busy(false)).ok();
/// });
/// ```
pub struct UiBridge<T: ComponentHandle> {
    /// Weak reference to the UI component to prevent circular references
    ui_weak: Weak<T>,
}

// Manual Clone implementation to avoid requiring T: Clone
impl<T: ComponentHandle> Clone for UiBridge<T> {
    fn clone(&self) -> Self {
        Self {
            ui_weak: self.ui_weak.clone(),
        }
    }
}

impl<T: ComponentHandle + 'static> UiBridge<T> {
    pub fn new(ui: &T) -> Self {
        Self {
            ui_weak: ui.as_weak(),
        }
    }

    /// Schedule a UI update from any thread
    ///
    /// The closure runs on the next event loop iteration. If the component
    /// has been dropped by then, the update is silently skipped.
    ///
    /// # Errors
    ///
    /// [`ShellError::EventLoop`] if the event loop is not running (never
    /// started or already quit).
    pub fn update_ui<F>(&self, update: F) -> Result<(), ShellError>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.ui_weak
            .upgrade_in_event_loop(move |ui| update(&ui))
            .map_err(ShellError::from)
    }
}
