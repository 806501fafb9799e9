// Ordered task list over a persisted store

use crate::backend::StorageBackend;
use crate::store::PersistedStore;
use crate::task::Task;
use tracing::debug;

/// Storage key the task list persists under.
pub const TASKS_KEY: &str = "todos";

/// Ordered sequence of [`Task`] records backed by one [`PersistedStore`].
///
/// Every mutation reads the current sequence, computes a new one, and writes
/// it back through the store; unknown ids make each operation a no-op. Call
/// [`hydrate`](Self::hydrate) once the backend is attachable, before the
/// first mutation that should persist.
pub struct TaskList<B: StorageBackend> {
    store: PersistedStore<Vec<Task>, B>,
}

impl<B: StorageBackend> TaskList<B> {
    /// Create an empty list over `backend`. Performs no I/O.
    pub fn new(backend: B) -> Self {
        Self {
            store: PersistedStore::new(backend, TASKS_KEY, Vec::new()),
        }
    }

    /// Reconcile with whatever a previous session persisted. See
    /// [`PersistedStore::hydrate`].
    pub fn hydrate(&mut self) {
        self.store.hydrate();
    }

    pub fn is_hydrated(&self) -> bool {
        self.store.is_hydrated()
    }

    /// Current records, in list order.
    pub fn tasks(&self) -> &[Task] {
        self.store.get()
    }

    /// Append a new task and return its id.
    ///
    /// Text is trimmed first; an empty result is a no-op returning `None`.
    pub fn append(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring append of empty text");
            return None;
        }

        let task = Task::new(text);
        let id = task.id.clone();
        self.store.update(|tasks| {
            let mut next = tasks.clone();
            next.push(task);
            next
        });
        Some(id)
    }

    /// Flip the completed flag on the task matching `id`.
    pub fn toggle(&mut self, id: &str) {
        self.store.update(|tasks| {
            tasks
                .iter()
                .map(|task| {
                    if task.id == id {
                        let mut task = task.clone();
                        task.completed = !task.completed;
                        task
                    } else {
                        task.clone()
                    }
                })
                .collect()
        });
    }

    /// Drop the task matching `id`, keeping the rest in order.
    pub fn remove(&mut self, id: &str) {
        self.store.update(|tasks| {
            tasks
                .iter()
                .filter(|task| task.id != id)
                .cloned()
                .collect()
        });
    }

    /// Relocate the source task to the target's former position.
    ///
    /// Splice semantics: the source is removed and re-inserted at the index
    /// the target held before the call, shifting the records in between by
    /// one slot. Not a swap, and not self-inverse once the list holds three
    /// or more items. Missing ids or equal positions leave the list as is.
    pub fn reorder(&mut self, source_id: &str, target_id: &str) {
        self.store.update(|tasks| {
            let source = tasks.iter().position(|task| task.id == source_id);
            let target = tasks.iter().position(|task| task.id == target_id);

            match (source, target) {
                (Some(from), Some(to)) if from != to => {
                    let mut next = tasks.clone();
                    let task = next.remove(from);
                    next.insert(to, task);
                    next
                }
                _ => tasks.clone(),
            }
        });
    }

    /// Count of tasks not yet completed.
    pub fn remaining(&self) -> usize {
        self.tasks().iter().filter(|task| !task.completed).count()
    }

    /// Total count of tasks.
    pub fn total(&self) -> usize {
        self.tasks().len()
    }
}
