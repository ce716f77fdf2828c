//! Validated parent/child structure of the configured dropdowns.

use std::collections::{BTreeMap, BTreeSet};

use cascade_model::{DropdownOption, DropdownSpec, OptionContext, find_conflict};

use crate::error::ConfigError;

/// Dropdown configuration checked to form a forest.
///
/// Children and descendant lists follow configuration order and are computed
/// once at construction.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    specs: Vec<DropdownSpec>,
    index: BTreeMap<String, usize>,
    children: BTreeMap<String, Vec<String>>,
    descendants: BTreeMap<String, Vec<String>>,
}

impl Hierarchy {
    /// Validate `specs` and index their relationships.
    ///
    /// # Errors
    ///
    /// Blank or duplicate ids, self parents, unknown parents and cycles are
    /// all rejected, as are seed lists that repeat an option (ignoring case)
    /// or contain the add-new value.
    pub fn new(specs: Vec<DropdownSpec>) -> Result<Self, ConfigError> {
        let mut index = BTreeMap::new();
        for (position, spec) in specs.iter().enumerate() {
            if spec.id.trim().is_empty() {
                return Err(ConfigError::BlankId { index: position });
            }
            if index.insert(spec.id.clone(), position).is_some() {
                return Err(ConfigError::DuplicateId {
                    id: spec.id.clone(),
                });
            }
            check_seeds(spec)?;
        }

        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for spec in &specs {
            let Some(parent) = &spec.depends_on else {
                continue;
            };
            if *parent == spec.id {
                return Err(ConfigError::SelfParent {
                    id: spec.id.clone(),
                });
            }
            if !index.contains_key(parent) {
                return Err(ConfigError::DanglingParent {
                    id: spec.id.clone(),
                    parent: parent.clone(),
                });
            }
            children
                .entry(parent.clone())
                .or_default()
                .push(spec.id.clone());
        }

        let mut descendants = BTreeMap::new();
        for spec in &specs {
            descendants.insert(spec.id.clone(), collect_descendants(&spec.id, &children)?);
        }

        tracing::debug!(dropdowns = specs.len(), "validated dropdown hierarchy");
        Ok(Self {
            specs,
            index,
            children,
            descendants,
        })
    }

    /// Every spec in configuration order.
    pub fn specs(&self) -> &[DropdownSpec] {
        &self.specs
    }

    /// Look up a spec by id.
    pub fn spec(&self, id: &str) -> Option<&DropdownSpec> {
        self.index.get(id).map(|&position| &self.specs[position])
    }

    /// Whether `id` is configured.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Specs without a parent, in configuration order.
    pub fn roots(&self) -> impl Iterator<Item = &DropdownSpec> {
        self.specs.iter().filter(|spec| spec.is_root())
    }

    /// Direct children of `id`.
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every dropdown below `id`, depth first.
    pub fn descendants_of(&self, id: &str) -> &[String] {
        self.descendants.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The parent chain of `id`, root first, excluding `id` itself.
    pub fn ancestors_of(&self, id: &str) -> Vec<&DropdownSpec> {
        let mut chain = Vec::new();
        let mut current = self.spec(id).and_then(|spec| spec.depends_on.as_deref());
        // Bounded by the spec count; construction already rejected cycles.
        while let Some(parent_id) = current {
            let Some(parent) = self.spec(parent_id) else {
                break;
            };
            if chain.len() >= self.specs.len() {
                break;
            }
            chain.push(parent);
            current = parent.depends_on.as_deref();
        }
        chain.reverse();
        chain
    }
}

/// Reject seed lists the store could not hold.
///
/// Only the lists a dropdown actually uses are checked; the other kind is
/// ignored with a warning.
fn check_seeds(spec: &DropdownSpec) -> Result<(), ConfigError> {
    let mut lists: Vec<(OptionContext, &[DropdownOption])> = Vec::new();
    match &spec.depends_on {
        None => {
            if !spec.seed_contexts.is_empty() {
                tracing::warn!(
                    dropdown = %spec.id,
                    "seed_contexts on a root dropdown are ignored; use seed_options"
                );
            }
            lists.push((OptionContext::root(&spec.id), spec.seed_options.as_slice()));
        }
        Some(parent) => {
            if !spec.seed_options.is_empty() {
                tracing::warn!(
                    dropdown = %spec.id,
                    "seed_options on a dependent dropdown are ignored; use seed_contexts"
                );
            }
            for (parent_value, options) in &spec.seed_contexts {
                lists.push((
                    OptionContext::dependent(parent, parent_value, &spec.id),
                    options.as_slice(),
                ));
            }
        }
    }

    for (context, options) in lists {
        for (position, option) in options.iter().enumerate() {
            if option.is_reserved() {
                return Err(ConfigError::ReservedSeed {
                    id: spec.id.clone(),
                    context,
                });
            }
            if find_conflict(&options[..position], option).is_some() {
                return Err(ConfigError::DuplicateSeed {
                    id: spec.id.clone(),
                    context,
                    label: option.label.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Depth-first walk over child edges, failing on the first repeated id.
fn collect_descendants(
    start: &str,
    children: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<String>, ConfigError> {
    let mut visited = BTreeSet::from([start.to_string()]);
    let mut path = vec![start.to_string()];
    let mut out = Vec::new();
    walk(start, children, &mut visited, &mut path, &mut out)?;
    Ok(out)
}

fn walk(
    node: &str,
    children: &BTreeMap<String, Vec<String>>,
    visited: &mut BTreeSet<String>,
    path: &mut Vec<String>,
    out: &mut Vec<String>,
) -> Result<(), ConfigError> {
    for child in children.get(node).into_iter().flatten() {
        if !visited.insert(child.clone()) {
            let mut cycle = path.clone();
            cycle.push(child.clone());
            return Err(ConfigError::Cycle { path: cycle });
        }
        out.push(child.clone());
        path.push(child.clone());
        walk(child, children, visited, path, out)?;
        path.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_model::ADD_NEW_SENTINEL;

    fn devices() -> Vec<DropdownSpec> {
        vec![
            DropdownSpec::new("device", "Device"),
            DropdownSpec::new("brand", "Brand").child_of("device"),
            DropdownSpec::new("series", "Series").child_of("brand"),
            DropdownSpec::new("model", "Model").child_of("series"),
            DropdownSpec::new("color", "Color").child_of("device"),
            DropdownSpec::new("region", "Region"),
        ]
    }

    #[test]
    fn test_children_and_descendants() {
        let hierarchy = Hierarchy::new(devices()).unwrap();

        assert_eq!(hierarchy.children_of("device"), ["brand", "color"]);
        assert_eq!(
            hierarchy.descendants_of("device"),
            ["brand", "series", "model", "color"]
        );
        assert_eq!(hierarchy.descendants_of("series"), ["model"]);
        assert!(hierarchy.descendants_of("model").is_empty());
        assert!(hierarchy.descendants_of("region").is_empty());
        assert!(hierarchy.descendants_of("missing").is_empty());
    }

    #[test]
    fn test_roots_and_ancestors() {
        let hierarchy = Hierarchy::new(devices()).unwrap();

        let roots: Vec<_> = hierarchy.roots().map(|spec| spec.id.as_str()).collect();
        assert_eq!(roots, ["device", "region"]);

        let ancestors: Vec<_> = hierarchy
            .ancestors_of("model")
            .into_iter()
            .map(|spec| spec.id.as_str())
            .collect();
        assert_eq!(ancestors, ["device", "brand", "series"]);
        assert!(hierarchy.ancestors_of("device").is_empty());
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut specs = devices();
        specs.push(DropdownSpec::new("brand", "Another brand"));
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::DuplicateId { id }) if id == "brand"
        ));
    }

    #[test]
    fn test_rejects_blank_id() {
        let specs = vec![DropdownSpec::new("  ", "Blank")];
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::BlankId { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_dangling_parent() {
        let specs = vec![DropdownSpec::new("brand", "Brand").child_of("device")];
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::DanglingParent { id, parent }) if id == "brand" && parent == "device"
        ));
    }

    #[test]
    fn test_rejects_self_parent() {
        let specs = vec![DropdownSpec::new("a", "A").child_of("a")];
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::SelfParent { .. })
        ));
    }

    #[test]
    fn test_rejects_cycle() {
        let specs = vec![
            DropdownSpec::new("root", "Root"),
            DropdownSpec::new("a", "A").child_of("c"),
            DropdownSpec::new("b", "B").child_of("a"),
            DropdownSpec::new("c", "C").child_of("b"),
        ];
        match Hierarchy::new(specs) {
            Err(ConfigError::Cycle { path }) => {
                assert_eq!(path.first(), path.last());
                assert_eq!(path.len(), 4);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_case_insensitive_duplicate_root_seed() {
        let specs = vec![
            DropdownSpec::new("a", "A")
                .with_seed("apple", "Apple")
                .with_seed("APPLE", "apple"),
        ];
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::DuplicateSeed { id, context, label })
                if id == "a" && context == OptionContext::root("a") && label == "apple"
        ));
    }

    #[test]
    fn test_rejects_duplicate_seed_context() {
        let specs = vec![
            DropdownSpec::new("device", "Device").with_seed("phone", "Phone"),
            DropdownSpec::new("brand", "Brand").child_of("device").with_seed_context(
                "phone",
                vec![
                    DropdownOption::from_label("Apple"),
                    DropdownOption::new("apple_inc", "APPLE"),
                ],
            ),
        ];
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::DuplicateSeed { context, .. })
                if context == OptionContext::dependent("device", "phone", "brand")
        ));
    }

    #[test]
    fn test_rejects_reserved_seed() {
        let specs = vec![DropdownSpec::new("a", "A").with_seed(ADD_NEW_SENTINEL, "Add new")];
        assert!(matches!(
            Hierarchy::new(specs),
            Err(ConfigError::ReservedSeed { id, .. }) if id == "a"
        ));
    }

    #[test]
    fn test_ignored_seed_lists_are_not_checked() {
        let specs = vec![
            DropdownSpec::new("device", "Device")
                .with_seed("phone", "Phone")
                .with_seed_context(
                    "x",
                    vec![
                        DropdownOption::from_label("Dup"),
                        DropdownOption::from_label("dup"),
                    ],
                ),
        ];
        assert!(Hierarchy::new(specs).is_ok());
    }
}
