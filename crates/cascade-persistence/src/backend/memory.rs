//! In-memory backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use cascade_model::Store;

use crate::backend::StoreBackend;
use crate::error::{PersistenceError, Result};

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, Store>,
    fail_loads: bool,
    fail_saves: bool,
    saves: usize,
}

/// Backend keeping stores in process memory.
///
/// Clones share the same storage, so a test can keep one handle while the
/// core owns another. Loads and saves can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend already holding `store` under `key`.
    pub fn with_store(key: impl Into<String>, store: Store) -> Self {
        let backend = Self::new();
        if let Ok(mut state) = backend.state.lock() {
            state.entries.insert(key.into(), store);
        }
        backend
    }

    /// Make subsequent loads fail.
    pub fn fail_loads(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_loads = fail;
        }
    }

    /// Make subsequent saves fail.
    pub fn fail_saves(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_saves = fail;
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.state.lock().map(|state| state.saves).unwrap_or_default()
    }

    /// The store currently saved under `key`.
    pub fn stored(&self, key: &str) -> Option<Store> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.entries.get(key).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| PersistenceError::Unavailable {
            reason: "memory backend lock poisoned".to_string(),
        })
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<Store>> {
        let state = self.lock()?;
        if state.fail_loads {
            return Err(PersistenceError::Unavailable {
                reason: "load failure injected".to_string(),
            });
        }
        Ok(state.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, store: &Store) -> Result<()> {
        let mut state = self.lock()?;
        if state.fail_saves {
            return Err(PersistenceError::Unavailable {
                reason: "save failure injected".to_string(),
            });
        }
        state.entries.insert(key.to_string(), store.clone());
        state.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_model::DropdownOption;

    #[test]
    fn test_round_trip() {
        let mut backend = MemoryBackend::new();
        let mut store = Store::new();
        store
            .root_options
            .insert("device".into(), vec![DropdownOption::from_label("Phone")]);

        assert_eq!(backend.load("devices").unwrap(), None);
        backend.save("devices", &store).unwrap();
        assert_eq!(backend.load("devices").unwrap(), Some(store));
        assert_eq!(backend.save_count(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let handle = MemoryBackend::new();
        let mut owned = handle.clone();
        owned.save("devices", &Store::new()).unwrap();
        assert_eq!(handle.stored("devices"), Some(Store::new()));
    }

    #[test]
    fn test_injected_failures() {
        let mut backend = MemoryBackend::with_store("devices", Store::new());
        backend.fail_loads(true);
        backend.fail_saves(true);

        assert!(matches!(
            backend.load("devices"),
            Err(PersistenceError::Unavailable { .. })
        ));
        assert!(backend.save("devices", &Store::new()).is_err());
        assert_eq!(backend.save_count(), 0);

        backend.fail_loads(false);
        assert_eq!(backend.load("devices").unwrap(), Some(Store::new()));
    }
}
