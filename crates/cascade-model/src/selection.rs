//! Current selection per dropdown.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping from dropdown id to its chosen value.
///
/// An absent entry and an empty string both mean "unselected". Cleared
/// entries keep their key with an empty value so listeners can tell a
/// cascaded reset from a dropdown that was never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSnapshot {
    values: BTreeMap<String, String>,
}

impl SelectionSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected value, or `None` when unselected.
    pub fn get(&self, dropdown: &str) -> Option<&str> {
        self.values
            .get(dropdown)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The raw entry, including cleared (`""`) entries.
    pub fn entry(&self, dropdown: &str) -> Option<&str> {
        self.values.get(dropdown).map(String::as_str)
    }

    /// Whether the dropdown holds a non-empty value.
    pub fn is_selected(&self, dropdown: &str) -> bool {
        self.get(dropdown).is_some()
    }

    /// Whether any dropdown holds a non-empty value.
    pub fn has_selection(&self) -> bool {
        self.values.values().any(|value| !value.is_empty())
    }

    /// Write a value.
    pub fn set(&mut self, dropdown: impl Into<String>, value: impl Into<String>) {
        self.values.insert(dropdown.into(), value.into());
    }

    /// Clear a dropdown, keeping its key with an empty value.
    pub fn clear(&mut self, dropdown: impl Into<String>) {
        self.values.insert(dropdown.into(), String::new());
    }

    /// Iterate over every entry, cleared ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl fmt::Display for SelectionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value:?}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SelectionSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
