//! Selection cascade engine.
//!
//! Owns the [`SelectionSnapshot`]. Every committed selection clears all
//! descendants of the changed dropdown, so a non-empty entry always sits
//! below non-empty ancestors.
//!
//! Selections may be committed directly with [`CascadeEngine::select`] or
//! after a short settle delay: [`CascadeEngine::request_select`] parks the
//! value in a per-dropdown slot and [`CascadeEngine::commit_due`] commits
//! whatever has come due. A newer request replaces an older one.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use cascade_model::{ADD_NEW_SENTINEL, SelectionSnapshot};

use crate::error::SelectError;
use crate::notify::SelectionListener;
use crate::resolver::Resolver;

/// Settle delay applied when the configuration does not set one.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Observable state of one dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    /// A request is waiting for its settle delay.
    Pending {
        requested: String,
    },
    Selected(String),
}

#[derive(Debug, Clone)]
struct PendingSelection {
    value: String,
    due: Instant,
}

/// Applies selections and the cascade reset rule.
pub struct CascadeEngine {
    snapshot: SelectionSnapshot,
    pending: BTreeMap<String, PendingSelection>,
    settle_delay: Duration,
    listeners: Vec<Box<dyn SelectionListener>>,
}

impl Default for CascadeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl CascadeEngine {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            snapshot: SelectionSnapshot::new(),
            pending: BTreeMap::new(),
            settle_delay,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for committed selections.
    pub fn add_listener(&mut self, listener: Box<dyn SelectionListener>) {
        self.listeners.push(listener);
    }

    pub fn snapshot(&self) -> &SelectionSnapshot {
        &self.snapshot
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// State of one dropdown. A pending request shadows the committed value.
    pub fn state(&self, id: &str) -> SelectionState {
        if let Some(pending) = self.pending.get(id) {
            return SelectionState::Pending {
                requested: pending.value.clone(),
            };
        }
        match self.snapshot.get(id) {
            Some(value) => SelectionState::Selected(value.to_string()),
            None => SelectionState::Unselected,
        }
    }

    /// Select the first option of every root dropdown.
    ///
    /// Does nothing once any selection exists. Dependent dropdowns are never
    /// auto-selected. Returns whether anything was selected.
    pub fn initialize_defaults(&mut self, resolver: &Resolver<'_>) -> bool {
        if self.snapshot.has_selection() {
            return false;
        }
        let mut applied = false;
        for spec in resolver.hierarchy().roots() {
            if let Some(first) = resolver.resolve_options(spec, &self.snapshot).first() {
                tracing::debug!(dropdown = %spec.id, value = %first.value, "default selection");
                self.snapshot.set(&spec.id, &first.value);
                applied = true;
            }
        }
        if applied {
            self.notify();
        }
        applied
    }

    /// Commit `value` for `id` and clear every descendant.
    ///
    /// Any pending request for `id` or its descendants is dropped.
    ///
    /// # Errors
    ///
    /// Unknown dropdowns, the add-new sentinel and values outside the
    /// currently resolved options are rejected without changing anything.
    pub fn select(
        &mut self,
        resolver: &Resolver<'_>,
        id: &str,
        value: &str,
    ) -> Result<&SelectionSnapshot, SelectError> {
        self.validate(resolver, id, value)?;
        self.commit(resolver, id, value);
        Ok(&self.snapshot)
    }

    /// Park `value` for `id` until the settle delay passes.
    ///
    /// Replaces any earlier request for the same dropdown. Returns when the
    /// request becomes due.
    ///
    /// # Errors
    ///
    /// Same checks as [`Self::select`], applied against the current snapshot.
    pub fn request_select(
        &mut self,
        resolver: &Resolver<'_>,
        id: &str,
        value: &str,
        now: Instant,
    ) -> Result<Instant, SelectError> {
        self.validate(resolver, id, value)?;
        let due = now + self.settle_delay;
        let previous = self.pending.insert(
            id.to_string(),
            PendingSelection {
                value: value.to_string(),
                due,
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(dropdown = id, superseded = %previous.value, value, "selection superseded");
        }
        Ok(due)
    }

    /// Commit every pending request whose delay has passed, in id order.
    ///
    /// Each value is validated again against the snapshot at commit time; a
    /// request that is no longer valid is dropped. Returns the committed ids.
    pub fn commit_due(&mut self, resolver: &Resolver<'_>, now: Instant) -> Vec<String> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due <= now)
            .map(|(id, _)| id.clone())
            .collect();

        let mut committed = Vec::new();
        for id in due {
            // An earlier commit in this pass may have cleared it.
            let Some(pending) = self.pending.remove(&id) else {
                continue;
            };
            match self.validate(resolver, &id, &pending.value) {
                Ok(()) => {
                    self.commit(resolver, &id, &pending.value);
                    committed.push(id);
                }
                Err(e) => {
                    tracing::debug!(dropdown = %id, error = %e, "dropped stale pending selection");
                }
            }
        }
        committed
    }

    /// Drop the pending request for `id`. Returns whether one existed.
    pub fn cancel_pending(&mut self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Whether any request is waiting.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Earliest due time among pending requests.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|pending| pending.due).min()
    }

    fn validate(&self, resolver: &Resolver<'_>, id: &str, value: &str) -> Result<(), SelectError> {
        let spec = resolver
            .hierarchy()
            .spec(id)
            .ok_or_else(|| SelectError::UnknownDropdown { id: id.to_string() })?;
        if value == ADD_NEW_SENTINEL {
            return Err(SelectError::ReservedValue {
                dropdown: id.to_string(),
            });
        }
        let offered = resolver.resolve_options(spec, &self.snapshot);
        if !offered.iter().any(|option| option.value == value) {
            return Err(SelectError::InvalidSelection {
                dropdown: id.to_string(),
                value: value.to_string(),
            });
        }
        Ok(())
    }

    fn commit(&mut self, resolver: &Resolver<'_>, id: &str, value: &str) {
        self.snapshot.set(id, value);
        self.pending.remove(id);
        let descendants = resolver.hierarchy().descendants_of(id);
        for descendant in descendants {
            self.snapshot.clear(descendant);
            self.pending.remove(descendant);
        }
        tracing::info!(dropdown = id, value, cleared = descendants.len(), "selection committed");
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener.on_selection_change(&self.snapshot);
        }
    }
}

impl std::fmt::Debug for CascadeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadeEngine")
            .field("snapshot", &self.snapshot)
            .field("pending", &self.pending)
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}
