// Log bridge - mirrors tracing events into the window's log panel
//
// `GuiLogLayer` is installed once in the subscriber and stays there for the
// life of the process. Whether anything is shown depends on the sink held by
// the shared `LogBridge` handle: the window controller attaches a sink when
// it is built and detaches it when dropped. With no sink attached, the
// forwarding path is a no-op.

use crate::error::ShellError;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Receives formatted log lines
///
/// Called on whichever thread emitted the event, with no bridge lock held.
pub type LogSink = Arc<dyn Fn(String) + Send + Sync>;

/// Detachable handle between the tracing layer and the log panel
#[derive(Clone, Default)]
pub struct LogBridge {
    sink: Arc<Mutex<Option<LogSink>>>,
}

impl fmt::Debug for LogBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBridge")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl LogBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<LogSink>> {
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach a sink
    ///
    /// # Errors
    ///
    /// [`ShellError::SinkAlreadyAttached`] if another sink is present.
    pub fn attach(&self, sink: LogSink) -> Result<(), ShellError> {
        let mut slot = self.slot();
        if slot.is_some() {
            return Err(ShellError::SinkAlreadyAttached);
        }
        *slot = Some(sink);
        Ok(())
    }

    /// Null the sink; returns whether one was attached
    pub fn detach(&self) -> bool {
        self.slot().take().is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.slot().is_some()
    }

    /// Deliver a formatted line to the sink, if any
    pub fn forward(&self, line: String) {
        // Release the slot before calling out; the sink may log or detach
        let sink = self.slot().clone();
        if let Some(sink) = sink {
            sink(line);
        }
    }
}

/// Format a record the way the log panel shows it
pub fn format_gui_line(level: &Level, message: &str) -> String {
    format!("[{}] {}", level_name(level), message)
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Tracing layer forwarding INFO, WARN and ERROR events to a [`LogBridge`]
#[derive(Debug, Clone)]
pub struct GuiLogLayer {
    bridge: LogBridge,
}

impl GuiLogLayer {
    pub fn new(bridge: LogBridge) -> Self {
        Self { bridge }
    }
}

impl<S: Subscriber> Layer<S> for GuiLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = event.metadata().level();
        // Level ordering puts more verbose levels higher
        if *level > Level::INFO || !self.bridge.is_attached() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.bridge.forward(format_gui_line(level, &visitor.finish()));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
