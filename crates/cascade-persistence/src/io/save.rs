//! Store saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use cascade_model::Store;

use crate::error::{PersistenceError, Result};
use crate::io::hash::payload_hash;
use crate::types::StoreFile;

/// Encode a store into the bytes of a [`StoreFile`] envelope.
///
/// The envelope is pretty-printed so saved stores stay reviewable by hand.
pub fn encode_store_file(store: &Store) -> Result<Vec<u8>> {
    let checksum = payload_hash(store)?;
    let file = StoreFile::new(store.clone(), checksum);
    serde_json::to_vec_pretty(&file).map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })
}

/// Write bytes to `path` atomically.
///
/// Uses a temp file + rename so a crash mid-write never leaves a truncated
/// store behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote store file");
    Ok(())
}
