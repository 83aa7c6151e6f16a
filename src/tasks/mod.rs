// Task registry - tracks background worker threads by id
//
// Entries are added when a task is reserved, get their JoinHandle once the
// thread is spawned, and are removed either by the task's own cleanup guard
// or by the tick's liveness poll. All access goes through one Mutex.

use crate::error::ShellError;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

/// Unique identifier of a registered background task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct TaskEntry {
    name: String,
    /// `None` while the task is reserved but its thread is not spawned yet
    handle: Option<JoinHandle<()>>,
}

impl TaskEntry {
    fn is_alive(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| !h.is_finished())
    }
}

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    entries: Mutex<HashMap<TaskId, TaskEntry>>,
}

/// Thread-safe registry of running background tasks
///
/// Cheap to clone; all clones share the same map. The spinner is driven
/// solely by [`is_empty()`](Self::is_empty).
#[derive(Clone, Default)]
pub struct TaskRegistry {
    inner: Arc<RegistryInner>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<TaskId, TaskEntry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reserve an entry for a task that is about to start
    pub fn reserve(&self, name: impl Into<String>) -> TaskId {
        let id = TaskId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let name = name.into();
        tracing::debug!("Registering task {} '{}'", id, name);
        self.entries().insert(id, TaskEntry { name, handle: None });
        id
    }

    /// Reserve an entry unless a task with the same name is registered
    ///
    /// The check and the insert happen under one lock.
    pub fn reserve_unique(&self, name: &str) -> Result<TaskId, ShellError> {
        let mut entries = self.entries();
        if entries.values().any(|entry| entry.name == name) {
            return Err(ShellError::TaskAlreadyRunning(name.to_string()));
        }
        let id = TaskId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!("Registering task {} '{}'", id, name);
        entries.insert(
            id,
            TaskEntry {
                name: name.to_string(),
                handle: None,
            },
        );
        Ok(id)
    }

    /// Attach the spawned thread to a reserved entry
    ///
    /// If the task already finished and removed itself, the handle is
    /// dropped (detaching the thread) and nothing is re-inserted.
    pub fn attach(&self, id: TaskId, handle: JoinHandle<()>) {
        if let Some(entry) = self.entries().get_mut(&id) {
            entry.handle = Some(handle);
        }
    }

    /// Remove an entry; returns whether it was present
    pub fn remove(&self, id: TaskId) -> bool {
        let removed = self.entries().remove(&id);
        if let Some(entry) = &removed {
            tracing::debug!("Task {} '{}' removed from registry", id, entry.name);
        }
        removed.is_some()
    }

    /// Drop every entry whose thread has terminated
    ///
    /// Returns the number of entries reaped.
    pub fn reap_finished(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|id, entry| {
            let alive = entry.is_alive();
            if !alive {
                tracing::debug!("Reaped dead task {} '{}'", id, entry.name);
            }
            alive
        });
        before - entries.len()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.entries().contains_key(&id)
    }

    /// Whether a task with the given name is currently registered
    pub fn is_running(&self, name: &str) -> bool {
        self.entries().values().any(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Spawn a named worker thread tracked by this registry
    ///
    /// The entry is removed when `body` returns or unwinds. Refuses to start
    /// a second task with the same name while the first is registered.
    pub fn spawn<F>(&self, name: &str, body: F) -> Result<TaskHandle, ShellError>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.reserve_unique(name)?;
        let guard = RegistrationGuard {
            registry: self.clone(),
            id,
        };

        let spawned = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _guard = guard;
                body();
            });

        match spawned {
            Ok(handle) => {
                self.attach(id, handle);
                Ok(TaskHandle {
                    id,
                    name: name.to_string(),
                    registry: self.clone(),
                })
            }
            Err(e) => {
                // The closure (and its guard) was dropped, but be explicit
                self.remove(id);
                Err(ShellError::Spawn(e))
            }
        }
    }
}

/// Removes a registry entry when dropped, including during unwinding
struct RegistrationGuard {
    registry: TaskRegistry,
    id: TaskId,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

/// Handle to a spawned task, returned by [`TaskRegistry::spawn`]
#[derive(Clone)]
pub struct TaskHandle {
    id: TaskId,
    name: String,
    registry: TaskRegistry,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the task is still registered
    pub fn is_active(&self) -> bool {
        self.registry.contains(self.id)
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
