//! Persistence backends for cascade option stores.
//!
//! The core only needs a key-value collaborator that can `load` and `save` a
//! whole [`Store`](cascade_model::Store). This crate defines that seam and
//! ships two implementations.
//!
//! # Features
//!
//! - **Pluggable backends** through the [`StoreBackend`] trait
//! - **In-memory backend** with failure injection for tests
//! - **JSON file backend** with atomic writes and payload checksums
//!
//! # File Format
//!
//! [`JsonFileBackend`] writes `<dir>/<key>.json` holding a [`StoreFile`]
//! envelope:
//!
//! ```text
//! {
//!   "schema_version": 1,
//!   "saved_at": "2026-01-01T00:00:00+00:00",
//!   "payload_sha256": "<hex SHA-256 of the compact store JSON>",
//!   "store": { "root_options": { ... }, "relations": [ ... ] }
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cascade_persistence::{JsonFileBackend, StoreBackend};
//!
//! let mut backend = JsonFileBackend::new("/tmp/cascade");
//! backend.save("devices", &store)?;
//! let loaded = backend.load("devices")?;
//! ```

mod backend;
mod error;
mod io;
mod types;

pub use backend::{JsonFileBackend, MemoryBackend, StoreBackend};
pub use error::{PersistenceError, Result};
pub use io::{decode_store_file, encode_store_file, payload_hash};
pub use types::{CURRENT_SCHEMA_VERSION, FILE_EXTENSION, StoreFile};
