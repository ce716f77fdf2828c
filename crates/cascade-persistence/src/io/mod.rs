//! Encoding and file I/O for persisted stores.
//!
//! This module handles:
//! - Encoding stores into checksummed envelopes
//! - Atomic writes of encoded envelopes
//! - Decoding with version, checksum, and invariant validation

mod hash;
mod load;
mod save;

pub use hash::payload_hash;
pub use load::decode_store_file;
pub use save::encode_store_file;

pub(crate) use load::read_store_file;
pub(crate) use save::write_atomic;
