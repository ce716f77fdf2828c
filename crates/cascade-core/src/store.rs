//! The option store: persisted option sets plus copy-on-write mutation.

use std::collections::BTreeMap;

use cascade_model::{DropdownOption, OptionContext, Store, find_conflict};
use cascade_persistence::{PersistenceError, StoreBackend};

use crate::error::StoreError;
use crate::hierarchy::Hierarchy;
use crate::notify::DataListener;
use crate::tracker::DirtyTracker;

/// Owns the live [`Store`], its seed fallbacks and its backend.
///
/// Mutations run against a cloned [`StoreDraft`] and are swapped in only
/// when the whole edit succeeds, then saved immediately.
pub struct OptionStore {
    data: Store,
    seeds: BTreeMap<String, Vec<DropdownOption>>,
    backend: Box<dyn StoreBackend>,
    key: String,
    tracker: DirtyTracker,
    listeners: Vec<Box<dyn DataListener>>,
}

/// Result of a committed [`OptionStore::transact`] call.
#[derive(Debug)]
pub struct Committed<T> {
    /// Whatever the edit returned.
    pub value: T,

    /// Whether the edit changed the store.
    pub changed: bool,

    /// Outcome of the write-through save (`Ok` when nothing changed).
    pub saved: Result<(), PersistenceError>,
}

impl<T> Committed<T> {
    /// Collapse into the edit value, surfacing a failed save.
    pub fn into_result(self) -> Result<T, PersistenceError> {
        self.saved.map(|()| self.value)
    }
}

impl OptionStore {
    /// Load the store for `key`, falling back to the configuration's seeds.
    ///
    /// Loading never blocks startup. When the backend fails or holds
    /// unreadable data, the store starts from seeds and the error is returned
    /// alongside so the caller can warn the user.
    pub fn open(
        hierarchy: &Hierarchy,
        backend: Box<dyn StoreBackend>,
        key: impl Into<String>,
    ) -> (Self, Option<PersistenceError>) {
        let key = key.into();
        let (data, load_error) = match backend.load(&key) {
            Ok(Some(store)) => {
                tracing::info!(
                    key = %key,
                    backend = %backend.describe(),
                    options = store.option_count(),
                    "loaded option store"
                );
                (store, None)
            }
            Ok(None) => {
                tracing::info!(key = %key, "no saved options, starting from seeds");
                (Self::bootstrap(hierarchy), None)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to load options, starting from seeds");
                (Self::bootstrap(hierarchy), Some(e))
            }
        };

        let seeds = hierarchy
            .roots()
            .filter(|spec| !spec.seed_options.is_empty())
            .map(|spec| (spec.id.clone(), spec.seed_options.clone()))
            .collect();

        let store = Self {
            data,
            seeds,
            backend,
            key,
            tracker: DirtyTracker::new(),
            listeners: Vec::new(),
        };
        (store, load_error)
    }

    /// Build the initial store from `seed_contexts` of dependent dropdowns.
    ///
    /// Root seeds are not copied; they are served as a fallback until the
    /// first insert into that root materialises them.
    pub fn bootstrap(hierarchy: &Hierarchy) -> Store {
        let mut store = Store::new();
        for spec in hierarchy.specs() {
            let Some(parent) = &spec.depends_on else {
                continue;
            };
            for (parent_value, options) in &spec.seed_contexts {
                let context = OptionContext::dependent(parent, parent_value, &spec.id);
                store.context_or_insert(&context, options.clone());
            }
        }
        store
    }

    /// Register a listener for committed mutations.
    pub fn add_listener(&mut self, listener: Box<dyn DataListener>) {
        self.listeners.push(listener);
    }

    /// The live store.
    pub fn data(&self) -> &Store {
        &self.data
    }

    /// Key the store is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the last save failed and changes are not yet persisted.
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Options of a context.
    ///
    /// Root contexts fall back to seed options; dependent contexts without a
    /// relation are empty.
    pub fn get_options(&self, context: &OptionContext) -> &[DropdownOption] {
        lookup(&self.data, &self.seeds, context)
    }

    /// Insert one option into a context and save.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` leaves the store untouched. `Persistence` means the
    /// option was inserted in memory but the save failed.
    pub fn insert_option(
        &mut self,
        context: &OptionContext,
        option: DropdownOption,
    ) -> Result<(), StoreError> {
        let committed = self.transact(|draft| draft.insert_option(context, option))?;
        committed.into_result().map_err(StoreError::from)
    }

    /// Create empty relations for `child_ids` under `parent_id = parent_value`.
    ///
    /// Existing relations are left alone, so repeated calls are no-ops.
    /// Returns how many relations were created.
    pub fn ensure_child_contexts_exist(
        &mut self,
        parent_id: &str,
        parent_value: &str,
        child_ids: &[String],
    ) -> Result<usize, PersistenceError> {
        let committed = self.transact(|draft| {
            Ok::<_, PersistenceError>(draft.ensure_child_contexts_exist(
                parent_id,
                parent_value,
                child_ids,
            ))
        })?;
        committed.into_result()
    }

    /// Apply `edit` to a copy of the store and commit it if it succeeds.
    ///
    /// On `Err` the live store is untouched. On `Ok` with changes, the draft
    /// replaces the live store, is saved, and data listeners are notified.
    pub fn transact<T, E>(
        &mut self,
        edit: impl FnOnce(&mut StoreDraft<'_>) -> Result<T, E>,
    ) -> Result<Committed<T>, E> {
        let mut draft = StoreDraft {
            data: self.data.clone(),
            seeds: &self.seeds,
            changed: false,
        };
        let value = edit(&mut draft)?;
        let StoreDraft { data, changed, .. } = draft;

        if !changed {
            return Ok(Committed {
                value,
                changed,
                saved: Ok(()),
            });
        }

        self.data = data;
        self.tracker.mark_dirty();
        let saved = self.save();
        for listener in &self.listeners {
            listener.on_data_change(&self.data);
        }
        Ok(Committed {
            value,
            changed,
            saved,
        })
    }

    /// Write the whole store to the backend.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        match self.backend.save(&self.key, &self.data) {
            Ok(()) => {
                self.tracker.save_complete();
                tracing::info!(key = %self.key, options = self.data.option_count(), "saved option store");
                Ok(())
            }
            Err(e) => {
                self.tracker.save_failed();
                tracing::warn!(
                    key = %self.key,
                    failures = self.tracker.consecutive_failures(),
                    error = %e,
                    "failed to save option store"
                );
                Err(e)
            }
        }
    }

    /// Retry saving if the last save failed. Returns whether a save ran.
    pub fn flush(&mut self) -> Result<bool, PersistenceError> {
        if !self.tracker.is_dirty() {
            return Ok(false);
        }
        self.save().map(|()| true)
    }
}

impl std::fmt::Debug for OptionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionStore")
            .field("key", &self.key)
            .field("backend", &self.backend.describe())
            .field("data", &self.data)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

/// A private copy of the store being edited inside [`OptionStore::transact`].
pub struct StoreDraft<'a> {
    data: Store,
    seeds: &'a BTreeMap<String, Vec<DropdownOption>>,
    changed: bool,
}

impl StoreDraft<'_> {
    /// Options of a context as currently edited.
    pub fn options(&self, context: &OptionContext) -> &[DropdownOption] {
        lookup(&self.data, self.seeds, context)
    }

    /// Append an option to a context.
    ///
    /// The check is case-insensitive on both value and label and runs against
    /// the draft, so earlier inserts in the same edit count as existing.
    pub fn insert_option(
        &mut self,
        context: &OptionContext,
        option: DropdownOption,
    ) -> Result<(), StoreError> {
        if find_conflict(self.options(context), &option).is_some() {
            return Err(StoreError::AlreadyExists {
                context: context.clone(),
                label: option.label,
            });
        }

        let initial = match context {
            OptionContext::Root { dropdown } => {
                self.seeds.get(dropdown).cloned().unwrap_or_default()
            }
            OptionContext::Dependent { .. } => Vec::new(),
        };
        tracing::debug!(context = %context, value = %option.value, "inserting option");
        self.data.context_or_insert(context, initial).push(option);
        self.changed = true;
        Ok(())
    }

    /// Create empty relations for children lacking one. Returns the number
    /// created.
    pub fn ensure_child_contexts_exist(
        &mut self,
        parent_id: &str,
        parent_value: &str,
        child_ids: &[String],
    ) -> usize {
        let mut created = 0;
        for child in child_ids {
            let context = OptionContext::dependent(parent_id, parent_value, child);
            if !self.data.has_context(&context) {
                self.data.context_or_insert(&context, Vec::new());
                created += 1;
            }
        }
        if created > 0 {
            tracing::debug!(parent = parent_id, parent_value, created, "created child contexts");
            self.changed = true;
        }
        created
    }
}

fn lookup<'a>(
    data: &'a Store,
    seeds: &'a BTreeMap<String, Vec<DropdownOption>>,
    context: &OptionContext,
) -> &'a [DropdownOption] {
    if let Some(options) = data.options(context) {
        return options;
    }
    match context {
        OptionContext::Root { dropdown } => seeds.get(dropdown).map(Vec::as_slice).unwrap_or(&[]),
        OptionContext::Dependent { .. } => &[],
    }
}
