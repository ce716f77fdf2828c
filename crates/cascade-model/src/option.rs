//! Option values and labels.

use serde::{Deserialize, Serialize};

/// Separator that replaces each whitespace run when deriving a value.
pub const VALUE_SEPARATOR: char = '_';

/// Reserved value a presentation layer uses for its "add new option" entry.
///
/// Selecting it requests authoring instead of writing a selection, and no
/// authored option may derive to it.
pub const ADD_NEW_SENTINEL: &str = "__add_new__";

/// A single selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "OptionRepr")]
pub struct DropdownOption {
    /// Stable identifier, unique (case-insensitive) within its context.
    pub value: String,

    /// Display text, unique (case-insensitive) within its context.
    pub label: String,
}

impl DropdownOption {
    /// Create an option with an explicit value.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Create an option from user-entered text.
    ///
    /// The label is trimmed and the value derived with [`derive_value`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self {
            value: derive_value(label),
            label: label.to_string(),
        }
    }

    /// Whether the value is the reserved [`ADD_NEW_SENTINEL`].
    pub fn is_reserved(&self) -> bool {
        self.value == ADD_NEW_SENTINEL
    }

    /// Whether this option collides with `other` on value or label.
    pub fn conflicts_with(&self, other: &DropdownOption) -> bool {
        eq_ignore_case(&self.value, &other.value) || eq_ignore_case(&self.label, &other.label)
    }
}

/// Derive an option value from a label.
///
/// Leading and trailing whitespace is dropped and every internal whitespace
/// run becomes a single [`VALUE_SEPARATOR`]. Case is preserved.
pub fn derive_value(label: &str) -> String {
    let mut value = String::with_capacity(label.len());
    for word in label.split_whitespace() {
        if !value.is_empty() {
            value.push(VALUE_SEPARATOR);
        }
        value.push_str(word);
    }
    value
}

/// Unicode-aware case-insensitive comparison.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Find the first option in `options` that collides with `candidate`.
pub fn find_conflict<'a>(
    options: &'a [DropdownOption],
    candidate: &DropdownOption,
) -> Option<&'a DropdownOption> {
    options.iter().find(|existing| existing.conflicts_with(candidate))
}

/// Accepted serialized forms: a bare label, or a table with an optional value.
#[derive(Deserialize)]
#[serde(untagged)]
enum OptionRepr {
    Label(String),
    Full { value: Option<String>, label: String },
}

impl From<OptionRepr> for DropdownOption {
    fn from(repr: OptionRepr) -> Self {
        match repr {
            OptionRepr::Label(label) => DropdownOption::from_label(&label),
            OptionRepr::Full {
                value: Some(value),
                label,
            } => DropdownOption { value, label },
            OptionRepr::Full { value: None, label } => DropdownOption::from_label(&label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_value_collapses_whitespace() {
        assert_eq!(derive_value("Galaxy  S\t24"), "Galaxy_S_24");
        assert_eq!(derive_value("  Pixel 9 Pro "), "Pixel_9_Pro");
        assert_eq!(derive_value("Foo"), "Foo");
        assert_eq!(derive_value("   "), "");
    }

    #[test]
    fn test_derive_value_preserves_case() {
        assert_eq!(derive_value("iPhone Air"), "iPhone_Air");
    }

    #[test]
    fn test_from_label_trims() {
        let option = DropdownOption::from_label("  Surface Pro  ");
        assert_eq!(option.label, "Surface Pro");
        assert_eq!(option.value, "Surface_Pro");
    }

    #[test]
    fn test_conflicts_case_insensitive() {
        let apple = DropdownOption::from_label("apple");
        assert!(DropdownOption::from_label("Apple").conflicts_with(&apple));
        assert!(DropdownOption::new("other", "APPLE").conflicts_with(&apple));
        assert!(DropdownOption::new("APPLE", "Different").conflicts_with(&apple));
        assert!(!DropdownOption::from_label("Pear").conflicts_with(&apple));
    }

    #[test]
    fn test_eq_ignore_case_unicode() {
        assert!(eq_ignore_case("Ärger", "ärger"));
        assert!(!eq_ignore_case("Ärger", "arger"));
    }

    #[test]
    fn test_deserialize_shorthand_and_full() {
        let options: Vec<DropdownOption> =
            serde_json::from_str(r#"["Smart Watch", {"label": "Tablet"}, {"value": "pc", "label": "PC"}]"#)
                .unwrap();
        assert_eq!(
            options,
            vec![
                DropdownOption::new("Smart_Watch", "Smart Watch"),
                DropdownOption::new("Tablet", "Tablet"),
                DropdownOption::new("pc", "PC"),
            ]
        );
    }

    #[test]
    fn test_serialize_round_trip_keeps_explicit_value() {
        let option = DropdownOption::new("custom-id", "Custom Label");
        let json = serde_json::to_string(&option).unwrap();
        let back: DropdownOption = serde_json::from_str(&json).unwrap();
        assert_eq!(back, option);
    }

    #[test]
    fn test_reserved_sentinel() {
        assert!(DropdownOption::from_label(ADD_NEW_SENTINEL).is_reserved());
        assert!(!DropdownOption::from_label("add new").is_reserved());
    }
}
