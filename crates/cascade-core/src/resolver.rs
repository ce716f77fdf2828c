//! Resolution of the options valid for a dropdown right now.

use cascade_model::{DropdownOption, DropdownSpec, OptionContext, SelectionSnapshot};

use crate::hierarchy::Hierarchy;
use crate::store::OptionStore;

/// Read-only view joining the hierarchy with the live store.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    hierarchy: &'a Hierarchy,
    store: &'a OptionStore,
}

impl<'a> Resolver<'a> {
    pub fn new(hierarchy: &'a Hierarchy, store: &'a OptionStore) -> Self {
        Self { hierarchy, store }
    }

    pub fn hierarchy(&self) -> &'a Hierarchy {
        self.hierarchy
    }

    /// The context `spec` currently draws options from.
    ///
    /// `None` when the dropdown depends on a parent that is unselected.
    pub fn current_context(
        &self,
        spec: &DropdownSpec,
        snapshot: &SelectionSnapshot,
    ) -> Option<OptionContext> {
        match &spec.depends_on {
            None => Some(OptionContext::root(&spec.id)),
            Some(parent) => snapshot
                .get(parent)
                .map(|parent_value| OptionContext::dependent(parent, parent_value, &spec.id)),
        }
    }

    /// Options offered for `spec` under the given snapshot.
    ///
    /// Empty when the parent is unselected or nothing was stored for the
    /// parent's value yet.
    pub fn resolve_options(
        &self,
        spec: &DropdownSpec,
        snapshot: &SelectionSnapshot,
    ) -> &'a [DropdownOption] {
        let options = match self.current_context(spec, snapshot) {
            Some(context) => self.store.get_options(&context),
            None => &[],
        };
        tracing::debug!(dropdown = %spec.id, count = options.len(), "resolved options");
        options
    }

    /// [`Self::resolve_options`] by id. `None` for an unknown dropdown.
    pub fn options_for(
        &self,
        id: &str,
        snapshot: &SelectionSnapshot,
    ) -> Option<&'a [DropdownOption]> {
        self.hierarchy
            .spec(id)
            .map(|spec| self.resolve_options(spec, snapshot))
    }

    /// Labels of the selected ancestors of `id`, root first.
    ///
    /// Stops at the first unselected ancestor. A selected value that is not
    /// in its option list is shown as the raw value.
    pub fn selection_path(&self, id: &str, snapshot: &SelectionSnapshot) -> Vec<String> {
        let mut path = Vec::new();
        for ancestor in self.hierarchy.ancestors_of(id) {
            let Some(value) = snapshot.get(&ancestor.id) else {
                break;
            };
            path.push(self.label_of(ancestor, snapshot, value));
        }
        path
    }

    /// Display label for `value` in `spec`'s current option list.
    pub fn label_of(&self, spec: &DropdownSpec, snapshot: &SelectionSnapshot, value: &str) -> String {
        self.resolve_options(spec, snapshot)
            .iter()
            .find(|option| option.value == value)
            .map_or_else(|| value.to_string(), |option| option.label.clone())
    }

    /// Human-readable description of a context, using labels where known.
    pub fn describe_context(&self, context: &OptionContext, snapshot: &SelectionSnapshot) -> String {
        let label = |id: &str| {
            self.hierarchy
                .spec(id)
                .map_or_else(|| id.to_string(), |spec| spec.label.clone())
        };
        match context {
            OptionContext::Root { dropdown } => label(dropdown),
            OptionContext::Dependent {
                parent,
                parent_value,
                child,
            } => {
                let parent_label = self
                    .hierarchy
                    .spec(parent)
                    .map_or_else(|| parent_value.clone(), |spec| {
                        self.label_of(spec, snapshot, parent_value)
                    });
                format!("{} for {}", label(child), parent_label)
            }
        }
    }
}
