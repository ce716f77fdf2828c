//! On-disk envelope for persisted stores.

use cascade_model::Store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version.
///
/// Increment this when making breaking changes to the persistence format.
/// The loader rejects files with version > CURRENT_SCHEMA_VERSION.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Extension of files written by the JSON file backend.
pub const FILE_EXTENSION: &str = "json";

/// Envelope written around a [`Store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFile {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the store was saved (RFC 3339).
    pub saved_at: String,

    /// Hex SHA-256 of the compact JSON encoding of `store`.
    pub payload_sha256: String,

    /// The persisted store.
    pub store: Store,
}

impl StoreFile {
    /// Wrap a store, stamping the current time and its checksum.
    pub fn new(store: Store, payload_sha256: String) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Utc::now().to_rfc3339(),
            payload_sha256,
            store,
        }
    }

    /// Parse the saved_at timestamp.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
