//! The persisted option store aggregate.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::{DropdownOption, OptionContext, find_conflict};

/// Option sets of a dependent dropdown under one parent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Parent dropdown id.
    pub parent: String,

    /// Parent value this option set belongs to.
    pub parent_value: String,

    /// Child dropdown id.
    pub child: String,

    /// Options in authoring order.
    #[serde(default)]
    pub options: Vec<DropdownOption>,
}

impl Relation {
    /// Create an empty relation.
    pub fn new(
        parent: impl Into<String>,
        parent_value: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            parent_value: parent_value.into(),
            child: child.into(),
            options: Vec::new(),
        }
    }

    /// Whether this relation is keyed by the given triple.
    pub fn matches(&self, parent: &str, parent_value: &str, child: &str) -> bool {
        self.parent == parent && self.parent_value == parent_value && self.child == child
    }

    /// The context this relation stores.
    pub fn context(&self) -> OptionContext {
        OptionContext::dependent(&self.parent, &self.parent_value, &self.child)
    }
}

/// Root option lists plus dependent relations.
///
/// Root lists are keyed by dropdown id. Relations hold at most one entry per
/// `(parent, parent_value, child)` triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Options of dropdowns without a parent.
    #[serde(default)]
    pub root_options: BTreeMap<String, Vec<DropdownOption>>,

    /// Options of dependent dropdowns, keyed by parent value.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the relation for a triple.
    pub fn relation(&self, parent: &str, parent_value: &str, child: &str) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|relation| relation.matches(parent, parent_value, child))
    }

    /// Stored options of a context, or `None` when the bucket does not exist.
    pub fn options(&self, context: &OptionContext) -> Option<&[DropdownOption]> {
        match context {
            OptionContext::Root { dropdown } => {
                self.root_options.get(dropdown).map(Vec::as_slice)
            }
            OptionContext::Dependent {
                parent,
                parent_value,
                child,
            } => self
                .relation(parent, parent_value, child)
                .map(|relation| relation.options.as_slice()),
        }
    }

    /// Mutable access to the stored options of a context.
    pub fn options_mut(&mut self, context: &OptionContext) -> Option<&mut Vec<DropdownOption>> {
        match context {
            OptionContext::Root { dropdown } => self.root_options.get_mut(dropdown),
            OptionContext::Dependent {
                parent,
                parent_value,
                child,
            } => self
                .relations
                .iter_mut()
                .find(|relation| relation.matches(parent, parent_value, child))
                .map(|relation| &mut relation.options),
        }
    }

    /// Whether a bucket exists for the context.
    pub fn has_context(&self, context: &OptionContext) -> bool {
        self.options(context).is_some()
    }

    /// Return the bucket for `context`, creating it with `initial` when absent.
    pub fn context_or_insert(
        &mut self,
        context: &OptionContext,
        initial: Vec<DropdownOption>,
    ) -> &mut Vec<DropdownOption> {
        match context {
            OptionContext::Root { dropdown } => {
                self.root_options.entry(dropdown.clone()).or_insert(initial)
            }
            OptionContext::Dependent {
                parent,
                parent_value,
                child,
            } => {
                let index = match self
                    .relations
                    .iter()
                    .position(|relation| relation.matches(parent, parent_value, child))
                {
                    Some(index) => index,
                    None => {
                        let mut relation = Relation::new(parent, parent_value, child);
                        relation.options = initial;
                        self.relations.push(relation);
                        self.relations.len() - 1
                    }
                };
                &mut self.relations[index].options
            }
        }
    }

    /// Total number of stored options across every bucket.
    pub fn option_count(&self) -> usize {
        self.root_options.values().map(Vec::len).sum::<usize>()
            + self
                .relations
                .iter()
                .map(|relation| relation.options.len())
                .sum::<usize>()
    }

    /// Check the store invariants.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate relation triple or colliding option found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for relation in &self.relations {
            let key = (&relation.parent, &relation.parent_value, &relation.child);
            if !seen.insert(key) {
                return Err(ModelError::DuplicateRelation {
                    parent: relation.parent.clone(),
                    parent_value: relation.parent_value.clone(),
                    child: relation.child.clone(),
                });
            }
            check_unique(&relation.options, || relation.context())?;
        }
        for (dropdown, options) in &self.root_options {
            check_unique(options, || OptionContext::root(dropdown))?;
        }
        Ok(())
    }
}

fn check_unique(
    options: &[DropdownOption],
    context: impl Fn() -> OptionContext,
) -> Result<()> {
    for (index, option) in options.iter().enumerate() {
        if find_conflict(&options[..index], option).is_some() {
            return Err(ModelError::DuplicateOption {
                context: context(),
                label: option.label.clone(),
            });
        }
    }
    Ok(())
}
