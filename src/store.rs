// Generic persisted store with hydration-gated write-through

use crate::backend::StorageBackend;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Hydration progress of a [`PersistedStore`].
///
/// One-way: a store starts `Unhydrated` and transitions to `Hydrated` exactly
/// once, on the first completed `hydrate()` attempt, whether or not the
/// backend held anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    Unhydrated,
    Hydrated,
}

/// A typed value mirrored to a storage backend under a fixed key.
///
/// The in-memory value equals the initial value from construction onward, so
/// it is usable before any backend access. Reconciliation with whatever a
/// previous session persisted happens once, when the driver calls
/// [`hydrate`](Self::hydrate). Until then, writes update memory only; from
/// hydration onward every write is serialized and mirrored to the backend.
///
/// Backend failures never surface to the caller: a failed read leaves the
/// initial value in place, a failed write leaves the in-memory value correct
/// but un-persisted. Both are logged as warnings.
pub struct PersistedStore<T, B> {
    key: String,
    value: T,
    state: HydrationState,
    backend: B,
}

impl<T, B> PersistedStore<T, B>
where
    T: Serialize + DeserializeOwned,
    B: StorageBackend,
{
    /// Create a store holding `initial` under `key`. Performs no I/O.
    pub fn new(backend: B, key: impl Into<String>, initial: T) -> Self {
        Self {
            key: key.into(),
            value: initial,
            state: HydrationState::Unhydrated,
            backend,
        }
    }

    /// Current in-memory value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Storage key this store mirrors to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a reference to the injected backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> HydrationState {
        self.state
    }

    pub fn is_hydrated(&self) -> bool {
        self.state == HydrationState::Hydrated
    }

    /// Reconcile the in-memory value with the backend, exactly once.
    ///
    /// Call when the backend becomes attachable. A stored value that parses
    /// replaces the in-memory value; anything else (no entry, unreadable
    /// entry, unparseable entry) keeps the initial value. The store is marked
    /// hydrated in every case, and repeat calls are no-ops.
    pub fn hydrate(&mut self) {
        if self.state == HydrationState::Hydrated {
            debug!(key = %self.key, "store already hydrated, ignoring");
            return;
        }

        match self.backend.read(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    self.value = value;
                    debug!(key = %self.key, "restored persisted value");
                }
                Err(e) => {
                    warn!(key = %self.key, error = ?e, "Failed to parse persisted value, keeping default");
                }
            },
            Ok(None) => {
                debug!(key = %self.key, "no persisted value, keeping default");
            }
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to read persisted value, keeping default");
            }
        }

        self.state = HydrationState::Hydrated;
    }

    /// Replace the value.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Replace the value with a function of the current value.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    // Mirror the current value to the backend. Gated on hydration so an
    // un-loaded persisted value is never clobbered by the initial default.
    fn persist(&mut self) {
        if self.state != HydrationState::Hydrated {
            debug!(key = %self.key, "write suppressed before hydration");
            return;
        }

        match serde_json::to_string(&self.value) {
            Ok(raw) => {
                if let Err(e) = self.backend.write(&self.key, &raw) {
                    warn!(key = %self.key, error = ?e, "Failed to persist value");
                }
            }
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to serialize value");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use eyre::{Result, eyre};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_initial_value_usable_before_hydration() {
        let store = PersistedStore::new(MemoryBackend::new(), "counter", 7_i64);

        assert_eq!(*store.get(), 7);
        assert_eq!(store.state(), HydrationState::Unhydrated);
        assert!(!store.is_hydrated());
    }

    #[test]
    fn test_hydrate_adopts_seeded_value() {
        let backend = MemoryBackend::new().seed("counter", "42");
        let mut store = PersistedStore::new(backend, "counter", 0_i64);

        // Default until hydration completes
        assert_eq!(*store.get(), 0);

        store.hydrate();
        assert_eq!(*store.get(), 42);
        assert!(store.is_hydrated());
    }

    #[test]
    fn test_hydrate_without_entry_keeps_default() {
        let mut store = PersistedStore::new(MemoryBackend::new(), "counter", 5_i64);

        store.hydrate();
        assert_eq!(*store.get(), 5);
        assert!(store.is_hydrated());
    }

    #[test]
    fn test_hydrate_with_corrupt_payload_keeps_default() {
        let backend = MemoryBackend::new().seed("counter", "{not json");
        let mut store = PersistedStore::new(backend, "counter", 5_i64);

        store.hydrate();
        assert_eq!(*store.get(), 5);
        // Marked hydrated even after a failed parse, so writes flow again
        assert!(store.is_hydrated());
        store.set(6);
        assert_eq!(store.backend().raw("counter"), Some("6"));
    }

    #[test]
    fn test_writes_suppressed_before_hydration() {
        let backend = MemoryBackend::new().seed("counter", "42");
        let mut store = PersistedStore::new(backend, "counter", 0_i64);

        store.set(99);
        // In-memory change applied, backend untouched
        assert_eq!(*store.get(), 99);
        assert_eq!(store.backend().raw("counter"), Some("42"));

        // Hydration supersedes the pre-hydration set
        store.hydrate();
        assert_eq!(*store.get(), 42);
        assert_eq!(store.backend().raw("counter"), Some("42"));
    }

    #[test]
    fn test_writes_flow_after_hydration() {
        let mut store = PersistedStore::new(MemoryBackend::new(), "counter", 0_i64);

        store.hydrate();
        store.set(1);
        assert_eq!(store.backend().raw("counter"), Some("1"));

        store.update(|n| n + 10);
        assert_eq!(*store.get(), 11);
        assert_eq!(store.backend().raw("counter"), Some("11"));
    }

    #[test]
    fn test_update_receives_current_value() {
        let mut store = PersistedStore::new(MemoryBackend::new(), "items", Vec::<String>::new());
        store.hydrate();

        store.update(|items| {
            let mut next = items.clone();
            next.push("a".to_string());
            next
        });
        store.update(|items| {
            let mut next = items.clone();
            next.push("b".to_string());
            next
        });

        assert_eq!(store.get().as_slice(), ["a".to_string(), "b".to_string()]);
    }

    /// Backend that counts reads and can be told to fail either direction.
    struct FlakyBackend {
        reads: Rc<Cell<u32>>,
        fail_reads: bool,
        fail_writes: bool,
        stored: Option<String>,
    }

    impl StorageBackend for FlakyBackend {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            self.reads.set(self.reads.get() + 1);
            if self.fail_reads {
                return Err(eyre!("storage unavailable"));
            }
            Ok(self.stored.clone())
        }

        fn write(&mut self, _key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(eyre!("quota exceeded"));
            }
            self.stored = Some(value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_hydrate_reads_backend_exactly_once() {
        let reads = Rc::new(Cell::new(0));
        let backend = FlakyBackend {
            reads: reads.clone(),
            fail_reads: false,
            fail_writes: false,
            stored: Some("3".to_string()),
        };
        let mut store = PersistedStore::new(backend, "counter", 0_i64);

        store.hydrate();
        store.hydrate();
        store.hydrate();

        assert_eq!(reads.get(), 1);
        assert_eq!(*store.get(), 3);
    }

    #[test]
    fn test_read_failure_is_non_fatal() {
        let backend = FlakyBackend {
            reads: Rc::new(Cell::new(0)),
            fail_reads: true,
            fail_writes: false,
            stored: None,
        };
        let mut store = PersistedStore::new(backend, "counter", 5_i64);

        store.hydrate();
        assert_eq!(*store.get(), 5);
        assert!(store.is_hydrated());
    }

    #[test]
    fn test_write_failure_leaves_memory_intact() {
        let backend = FlakyBackend {
            reads: Rc::new(Cell::new(0)),
            fail_reads: false,
            fail_writes: true,
            stored: None,
        };
        let mut store = PersistedStore::new(backend, "counter", 0_i64);

        store.hydrate();
        store.set(8);

        assert_eq!(*store.get(), 8);
        // Store stays usable after the failed write
        store.update(|n| n + 1);
        assert_eq!(*store.get(), 9);
    }
}
