//! Error types for configuration, selection, and authoring.

use std::path::PathBuf;

use cascade_model::OptionContext;
use cascade_persistence::PersistenceError;
use thiserror::Error;

/// Malformed configuration. Construction refuses to proceed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read configuration file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected shape.
    #[error("Failed to parse configuration from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// A dropdown has an empty id.
    #[error("Dropdown #{index} has an empty id")]
    BlankId { index: usize },

    /// Two dropdowns share an id.
    #[error("Duplicate dropdown id '{id}'")]
    DuplicateId { id: String },

    /// A dropdown names itself as its parent.
    #[error("Dropdown '{id}' depends on itself")]
    SelfParent { id: String },

    /// A dropdown names a parent that is not configured.
    #[error("Dropdown '{id}' depends on unknown dropdown '{parent}'")]
    DanglingParent { id: String, parent: String },

    /// The parent relation loops back on itself.
    #[error("Dependency cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// Two seeds of one option list collide, ignoring case.
    #[error("Dropdown '{id}' seeds '{label}' twice in {context}")]
    DuplicateSeed {
        id: String,
        context: OptionContext,
        label: String,
    },

    /// A seed derives to the reserved add-new value.
    #[error("Dropdown '{id}' seeds the reserved add-new value in {context}")]
    ReservedSeed { id: String, context: OptionContext },
}

/// A selection that cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SelectError {
    /// No dropdown with this id is configured.
    #[error("Unknown dropdown '{id}'")]
    UnknownDropdown { id: String },

    /// The "add new option" sentinel is not a selectable value.
    #[error("'{dropdown}' cannot select the reserved add-new value")]
    ReservedValue { dropdown: String },

    /// The value is not among the options currently offered.
    #[error("'{value}' is not a valid option for '{dropdown}' right now")]
    InvalidSelection { dropdown: String, value: String },
}

/// Failure inserting into the option store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Value or label already present (case-insensitive) in the context.
    #[error("'{label}' already exists in {context}")]
    AlreadyExists {
        context: OptionContext,
        label: String,
    },

    /// The mutation was applied in memory but could not be saved.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A rejected or partially persisted authoring request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    /// No dropdown with this id is configured.
    #[error("Unknown dropdown '{id}'")]
    UnknownDropdown { id: String },

    /// The dropdown does not accept new options.
    #[error("'{dropdown}' does not accept new options")]
    NotCreatable { dropdown: String },

    /// Label is empty after trimming.
    #[error("Option name for '{dropdown}' is empty")]
    EmptyLabel { dropdown: String },

    /// Label derives to the reserved add-new value.
    #[error("'{label}' is reserved and cannot be used as an option")]
    ReservedValue { dropdown: String, label: String },

    /// Parent dropdown is unselected, so there is no context to author into.
    #[error("Select a value for '{parent}' before adding options to '{dropdown}'")]
    NoParentContext { dropdown: String, parent: String },

    /// Value or label already present (case-insensitive) in the context.
    #[error("'{label}' already exists in {context}")]
    AlreadyExists {
        context: OptionContext,
        label: String,
    },

    /// Bulk import text had no non-blank lines.
    #[error("Nothing to import into '{dropdown}'")]
    EmptyImport { dropdown: String },

    /// Every imported line duplicated an existing or earlier line.
    #[error("No new options for '{dropdown}': {} duplicate(s) skipped", .duplicates.len())]
    NoNewOptions {
        dropdown: String,
        duplicates: Vec<String>,
        reserved: Vec<String>,
    },

    /// The store changed in memory but saving it failed.
    #[error("Options were added but could not be saved")]
    PersistenceFailure {
        #[source]
        source: PersistenceError,
    },

    /// The newly authored option could not be selected.
    #[error(transparent)]
    Selection(#[from] SelectError),
}

impl AuthoringError {
    /// Short title for user-facing notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UnknownDropdown { .. } | Self::Selection(_) => "Unexpected error",
            Self::NotCreatable { .. } => "Adding not allowed",
            Self::EmptyLabel { .. } => "Missing name",
            Self::ReservedValue { .. } => "Reserved name",
            Self::NoParentContext { .. } => "Choose a parent first",
            Self::AlreadyExists { .. } => "Already exists",
            Self::EmptyImport { .. } => "Nothing to import",
            Self::NoNewOptions { .. } => "No new options",
            Self::PersistenceFailure { .. } => "Save failed",
        }
    }

    /// Whether the in-memory store was changed despite the error.
    pub fn store_changed(&self) -> bool {
        matches!(self, Self::PersistenceFailure { .. })
    }
}
