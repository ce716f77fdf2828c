//! Static dropdown configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::DropdownOption;

/// Static description of one dropdown.
///
/// Supplied by the caller at construction and immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownSpec {
    /// Unique identifier.
    pub id: String,

    /// Human-readable display name.
    pub label: String,

    /// Initial options, used only while the store holds nothing for this id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed_options: Vec<DropdownOption>,

    /// Parent dropdown id. `None` marks a root dropdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,

    /// Whether users may author new options for this dropdown.
    #[serde(default)]
    pub creatable: bool,

    /// Initial options per parent value, for dependent dropdowns.
    ///
    /// Materialised as relations when a store is bootstrapped.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seed_contexts: BTreeMap<String, Vec<DropdownOption>>,
}

impl DropdownSpec {
    /// Create a root dropdown with no seeds that does not allow authoring.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            seed_options: Vec::new(),
            depends_on: None,
            creatable: false,
            seed_contexts: BTreeMap::new(),
        }
    }

    /// Make this dropdown depend on `parent`.
    #[must_use]
    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.depends_on = Some(parent.into());
        self
    }

    /// Allow authoring new options.
    #[must_use]
    pub fn authorable(mut self) -> Self {
        self.creatable = true;
        self
    }

    /// Append a seed option.
    #[must_use]
    pub fn with_seed(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.seed_options.push(DropdownOption::new(value, label));
        self
    }

    /// Set the seed options offered under one parent value.
    #[must_use]
    pub fn with_seed_context(
        mut self,
        parent_value: impl Into<String>,
        options: Vec<DropdownOption>,
    ) -> Self {
        self.seed_contexts.insert(parent_value.into(), options);
        self
    }

    /// Whether this dropdown has no parent.
    pub fn is_root(&self) -> bool {
        self.depends_on.is_none()
    }
}
