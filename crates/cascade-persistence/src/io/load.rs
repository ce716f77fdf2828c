//! Store loading operations.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use cascade_model::Store;

use crate::error::{PersistenceError, Result};
use crate::io::hash::payload_hash;
use crate::types::{CURRENT_SCHEMA_VERSION, StoreFile};

/// Read a store file, returning `None` when it does not exist.
pub(crate) fn read_store_file(path: &Path, key: &str) -> Result<Option<Store>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PersistenceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let store = decode_store_file(&bytes, key)?;
    tracing::debug!(path = %path.display(), "read store file");
    Ok(Some(store))
}

/// Decode envelope bytes and validate the contained store.
///
/// Rejects future schema versions, checksum mismatches and stores that break
/// the model invariants.
pub fn decode_store_file(bytes: &[u8], key: &str) -> Result<Store> {
    let file: StoreFile =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::Deserialization {
            source: Box::new(e),
        })?;

    if file.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            key: key.to_string(),
        });
    }

    let actual = payload_hash(&file.store)?;
    if actual != file.payload_sha256 {
        return Err(PersistenceError::ChecksumMismatch {
            key: key.to_string(),
            expected: file.payload_sha256,
            actual,
        });
    }

    file.store
        .validate()
        .map_err(|e| PersistenceError::InvalidFormat {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    Ok(file.store)
}
