//! Data model for dependent dropdown option sets.
//!
//! This crate holds the plain data shared by the rest of the workspace:
//!
//! - [`DropdownSpec`] - static description of one dropdown and its parent
//! - [`DropdownOption`] - a `{ value, label }` pair with derived values
//! - [`OptionContext`] - the bucket an option set lives in
//! - [`Store`] - the persisted aggregate of root option lists and relations
//! - [`SelectionSnapshot`] - the current value per dropdown
//!
//! Nothing here performs I/O or knows about the selection cascade; those
//! live in `cascade-persistence` and `cascade-core`.

mod context;
mod error;
mod option;
mod selection;
mod spec;
mod store;

pub use context::OptionContext;
pub use error::{ModelError, Result};
pub use option::{
    ADD_NEW_SENTINEL, DropdownOption, VALUE_SEPARATOR, derive_value, eq_ignore_case,
    find_conflict,
};
pub use selection::SelectionSnapshot;
pub use spec::DropdownSpec;
pub use store::{Relation, Store};
