//! JSON file backend.

use std::path::PathBuf;

use cascade_model::Store;

use crate::backend::StoreBackend;
use crate::error::{PersistenceError, Result};
use crate::io::{encode_store_file, read_store_file, write_atomic};
use crate::types::FILE_EXTENSION;

/// Backend writing one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for `key`.
    ///
    /// # Errors
    ///
    /// Rejects keys that are empty, start with a dot, or contain anything but
    /// ASCII letters, digits, `-`, `_` and `.`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PersistenceError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self, key: &str) -> Result<Option<Store>> {
        let path = self.path_for(key)?;
        let store = read_store_file(&path, key)?;
        if store.is_some() {
            tracing::info!("Loaded store '{}' from {}", key, path.display());
        }
        Ok(store)
    }

    fn save(&mut self, key: &str, store: &Store) -> Result<()> {
        let path = self.path_for(key)?;
        let bytes = encode_store_file(store)?;
        write_atomic(&path, &bytes)?;
        tracing::info!("Saved store '{}' to {}", key, path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_model::{DropdownOption, Relation};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_loads_none() {
        let dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert_eq!(backend.load("devices").unwrap(), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("stores"));

        let mut store = Store::new();
        store.root_options.insert(
            "device".to_string(),
            vec![DropdownOption::from_label("Smart Phone")],
        );
        let mut relation = Relation::new("device", "Smart_Phone", "brand");
        relation.options.push(DropdownOption::new("apple", "Apple"));
        store.relations.push(relation);
        store.relations.push(Relation::new("device", "Smart_Phone", "color"));

        backend.save("devices", &store).unwrap();
        assert!(dir.path().join("stores/devices.json").exists());
        assert_eq!(backend.load("devices").unwrap(), Some(store));
    }

    #[test]
    fn test_invalid_keys() {
        let backend = JsonFileBackend::new("/tmp");
        for key in ["", "../escape", ".hidden", "a/b", "sp ace"] {
            assert!(
                matches!(backend.path_for(key), Err(PersistenceError::InvalidKey { .. })),
                "key {key:?} should be rejected"
            );
        }
        assert!(backend.path_for("devices-v2.backup").is_ok());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        fs::write(dir.path().join("devices.json"), b"{ truncated").unwrap();

        assert!(matches!(
            backend.load("devices"),
            Err(PersistenceError::Deserialization { .. })
        ));
    }
}
