//! Background loader for the initial data view contents.
//!
//! Runs on its own worker thread tracked by the [`TaskRegistry`]: waits a
//! fixed delay, builds the placeholder [`DataTree`] and hands it to a
//! delivery callback. The registry entry is dropped whatever the outcome.

use crate::error::ShellError;
use crate::models::DataTree;
use crate::tasks::{TaskHandle, TaskRegistry};
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

/// Registry name of the initial loader
pub const LOADER_TASK_NAME: &str = "load_initial_data";

/// Default wait before the placeholder data is published
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_secs(2);

/// Start the initial data loader
///
/// `deliver` runs on the worker thread; it is responsible for marshalling
/// the tree onto the UI thread. Errors and panics inside the worker are
/// logged, never propagated.
///
/// # Errors
///
/// Returns [`ShellError::TaskAlreadyRunning`] if a previous loader is still
/// registered, or [`ShellError::Spawn`] if the thread cannot be created.
pub fn load_initial_data<F>(
    registry: &TaskRegistry,
    delay: Duration,
    deliver: F,
) -> Result<TaskHandle, ShellError>
where
    F: FnOnce(DataTree) -> Result<()> + Send + 'static,
{
    tracing::info!("Creating thread: '{}'", LOADER_TASK_NAME);

    registry.spawn(LOADER_TASK_NAME, move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(delay, deliver)));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("{:#} [{}]", e, LOADER_TASK_NAME);
                tracing::error!("{:?}", e);
            }
            Err(payload) => {
                tracing::error!("panic: {} [{}]", panic_message(&*payload), LOADER_TASK_NAME);
            }
        }
    })
}

fn run<F>(delay: Duration, deliver: F) -> Result<()>
where
    F: FnOnce(DataTree) -> Result<()>,
{
    std::thread::sleep(delay);
    deliver(DataTree::placeholder())?;
    tracing::info!("Initial Data Loaded");
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*boxed), "static");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*boxed), "unknown panic payload");
    }
}
