//! The key-value persistence seam.

mod file;
mod memory;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

use cascade_model::Store;

use crate::error::Result;

/// Key-value persistence for whole stores.
///
/// `save` always receives the entire store, never a delta. A `load` right
/// after a successful `save` with the same key must return an equal store.
pub trait StoreBackend {
    /// Load the store saved under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<Store>>;

    /// Replace whatever is saved under `key` with `store`.
    fn save(&mut self, key: &str, store: &Store) -> Result<()>;

    /// Short description for logs (e.g. a directory path).
    fn describe(&self) -> String;
}

impl<B: StoreBackend + ?Sized> StoreBackend for Box<B> {
    fn load(&self, key: &str) -> Result<Option<Store>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, store: &Store) -> Result<()> {
        (**self).save(key, store)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
