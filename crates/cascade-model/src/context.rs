//! Option set buckets.

use std::fmt;

/// The bucket an option set lives in.
///
/// Root dropdowns own a single bucket. A dependent dropdown owns one bucket
/// per parent value; sibling buckets never share options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionContext {
    /// Options of a dropdown without a parent.
    Root { dropdown: String },

    /// Options of `child` offered while `parent` holds `parent_value`.
    Dependent {
        parent: String,
        parent_value: String,
        child: String,
    },
}

impl OptionContext {
    /// Create a root context.
    pub fn root(dropdown: impl Into<String>) -> Self {
        Self::Root {
            dropdown: dropdown.into(),
        }
    }

    /// Create a dependent context.
    pub fn dependent(
        parent: impl Into<String>,
        parent_value: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self::Dependent {
            parent: parent.into(),
            parent_value: parent_value.into(),
            child: child.into(),
        }
    }

    /// The dropdown whose options live in this bucket.
    pub fn dropdown(&self) -> &str {
        match self {
            Self::Root { dropdown } => dropdown,
            Self::Dependent { child, .. } => child,
        }
    }
}

impl fmt::Display for OptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root { dropdown } => write!(f, "{dropdown}"),
            Self::Dependent {
                parent,
                parent_value,
                child,
            } => write!(f, "{child} (under {parent}={parent_value})"),
        }
    }
}
