//! Payload hashing for integrity checks.

use cascade_model::Store;
use sha2::{Digest, Sha256};

use crate::error::{PersistenceError, Result};

/// Compute the hex SHA-256 of a store's compact JSON encoding.
///
/// The encoding is deterministic: root lists are keyed by a sorted map and
/// relations keep their stored order.
pub fn payload_hash(store: &Store) -> Result<String> {
    let bytes = serde_json::to_vec(store).map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
