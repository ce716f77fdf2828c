//! Conditional option store and selection cascade for dependent dropdowns.
//!
//! A user picks a chain of dependent values (device, brand, series, model).
//! The options offered at each step depend on the value chosen one step up,
//! and users may add options at runtime.
//!
//! # Components
//!
//! - [`Hierarchy`]: validated parent/child structure of the dropdowns
//! - [`OptionStore`]: persisted option sets with copy-on-write mutation
//! - [`Resolver`]: which options are valid right now
//! - [`CascadeEngine`]: selections, settle delay and the cascade reset rule
//! - [`AuthoringService`]: single add and bulk import
//! - [`Session`]: everything above behind one facade
//!
//! # Example
//!
//! ```ignore
//! use cascade_core::{Session, SelectOutcome};
//! use cascade_model::DropdownSpec;
//!
//! let mut session = Session::builder(vec![
//!     DropdownSpec::new("a", "A").with_seed("x", "X"),
//!     DropdownSpec::new("b", "B").child_of("a").authorable(),
//! ])
//! .build()?;
//!
//! session.add_option("b", "Foo")?;
//! assert_eq!(session.snapshot().get("b"), Some("Foo"));
//! ```

pub mod authoring;
pub mod cascade;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod notify;
pub mod resolver;
pub mod session;
pub mod store;
mod tracker;

pub use authoring::{AuthoringService, ImportReport, parse_import_lines};
pub use cascade::{CascadeEngine, DEFAULT_SETTLE_DELAY, SelectionState};
pub use config::{CascadeConfig, SessionSettings};
pub use error::{AuthoringError, ConfigError, SelectError, StoreError};
pub use hierarchy::Hierarchy;
pub use notify::{
    DataListener, Notification, NotificationKind, NotificationLog, Notifier, SelectionListener,
    TracingNotifier,
};
pub use resolver::Resolver;
pub use session::{SelectOutcome, Session, SessionBuilder};
pub use store::{Committed, OptionStore, StoreDraft};
