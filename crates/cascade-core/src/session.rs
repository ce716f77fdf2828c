//! Session facade wiring hierarchy, store, engine and authoring together.

use std::time::{Duration, Instant};

use cascade_model::{
    ADD_NEW_SENTINEL, DropdownOption, DropdownSpec, OptionContext, SelectionSnapshot,
};
use cascade_persistence::{MemoryBackend, PersistenceError, StoreBackend};

use crate::authoring::{AuthoringService, ImportReport};
use crate::cascade::{CascadeEngine, DEFAULT_SETTLE_DELAY, SelectionState};
use crate::config::CascadeConfig;
use crate::error::{AuthoringError, ConfigError, SelectError};
use crate::hierarchy::Hierarchy;
use crate::notify::{
    DataListener, NotificationKind, Notifier, SelectionListener, TracingNotifier,
};
use crate::resolver::Resolver;
use crate::store::OptionStore;

/// What a selection request led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection was applied.
    Committed(SelectionSnapshot),

    /// The selection waits for its settle delay.
    Pending { due: Instant },

    /// The add-new entry was chosen; the caller should ask for a label and
    /// call [`Session::add_option`] or [`Session::import_options`].
    AuthoringRequested {
        dropdown: String,
        context: OptionContext,
    },
}

/// Builder for a [`Session`].
pub struct SessionBuilder {
    specs: Vec<DropdownSpec>,
    backend: Option<Box<dyn StoreBackend>>,
    store_key: String,
    settle_delay: Duration,
    notifier: Option<Box<dyn Notifier>>,
    selection_listeners: Vec<Box<dyn SelectionListener>>,
    data_listeners: Vec<Box<dyn DataListener>>,
}

impl SessionBuilder {
    pub fn new(specs: Vec<DropdownSpec>) -> Self {
        Self {
            specs,
            backend: None,
            store_key: "options".to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            notifier: None,
            selection_listeners: Vec::new(),
            data_listeners: Vec::new(),
        }
    }

    /// Persist through `backend`. Defaults to an in-memory backend.
    #[must_use]
    pub fn backend(mut self, backend: impl StoreBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    #[must_use]
    pub fn store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Report user feedback through `notifier`. Defaults to the log.
    #[must_use]
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    #[must_use]
    pub fn on_selection_change(mut self, listener: impl SelectionListener + 'static) -> Self {
        self.selection_listeners.push(Box::new(listener));
        self
    }

    #[must_use]
    pub fn on_data_change(mut self, listener: impl DataListener + 'static) -> Self {
        self.data_listeners.push(Box::new(listener));
        self
    }

    /// Validate the configuration, load the store and apply defaults.
    ///
    /// A store that fails to load is replaced by seeds and reported through
    /// the notifier; it does not fail the build.
    pub fn build(self) -> Result<Session, ConfigError> {
        let hierarchy = Hierarchy::new(self.specs)?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Box::new(TracingNotifier));
        let backend = self
            .backend
            .unwrap_or_else(|| Box::new(MemoryBackend::new()));

        let (mut store, load_error) = OptionStore::open(&hierarchy, backend, self.store_key);
        if let Some(e) = load_error {
            notifier.notify(
                NotificationKind::Error,
                "Could not load saved options",
                &format!("{} Starting from defaults.", e.user_message()),
            );
        }
        for listener in self.data_listeners {
            store.add_listener(listener);
        }

        let mut engine = CascadeEngine::new(self.settle_delay);
        for listener in self.selection_listeners {
            engine.add_listener(listener);
        }
        engine.initialize_defaults(&Resolver::new(&hierarchy, &store));

        tracing::info!(
            dropdowns = hierarchy.specs().len(),
            key = store.key(),
            "session ready"
        );
        Ok(Session {
            hierarchy,
            store,
            engine,
            notifier,
        })
    }
}

/// One user's cascade: configuration, option store and current selection.
pub struct Session {
    hierarchy: Hierarchy,
    store: OptionStore,
    engine: CascadeEngine,
    notifier: Box<dyn Notifier>,
}

impl Session {
    pub fn builder(specs: Vec<DropdownSpec>) -> SessionBuilder {
        SessionBuilder::new(specs)
    }

    /// Builder preloaded with a parsed configuration.
    pub fn from_config(config: CascadeConfig) -> SessionBuilder {
        let delay = config.settle_delay();
        SessionBuilder::new(config.dropdowns)
            .store_key(config.session.store_key)
            .settle_delay(delay)
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    pub fn snapshot(&self) -> &SelectionSnapshot {
        self.engine.snapshot()
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.hierarchy, &self.store)
    }

    /// Options currently offered for `id`. `None` for an unknown dropdown.
    pub fn options(&self, id: &str) -> Option<&[DropdownOption]> {
        self.resolver().options_for(id, self.engine.snapshot())
    }

    /// Breadcrumb labels above `id`.
    pub fn selection_path(&self, id: &str) -> Vec<String> {
        self.resolver().selection_path(id, self.engine.snapshot())
    }

    pub fn state(&self, id: &str) -> SelectionState {
        self.engine.state(id)
    }

    /// Select `value` for `id` immediately.
    ///
    /// The add-new sentinel on a creatable dropdown becomes an authoring
    /// request instead of a selection.
    pub fn select(&mut self, id: &str, value: &str) -> Result<SelectOutcome, SelectError> {
        if let Some(outcome) = self.authoring_request(id, value) {
            return Ok(outcome);
        }
        let resolver = Resolver::new(&self.hierarchy, &self.store);
        let snapshot = self.engine.select(&resolver, id, value)?;
        Ok(SelectOutcome::Committed(snapshot.clone()))
    }

    /// Select `value` for `id` after the settle delay.
    pub fn request_select(
        &mut self,
        id: &str,
        value: &str,
        now: Instant,
    ) -> Result<SelectOutcome, SelectError> {
        if let Some(outcome) = self.authoring_request(id, value) {
            return Ok(outcome);
        }
        let resolver = Resolver::new(&self.hierarchy, &self.store);
        let due = self.engine.request_select(&resolver, id, value, now)?;
        Ok(SelectOutcome::Pending { due })
    }

    /// Commit pending selections that are due. Returns the committed ids.
    pub fn commit_due(&mut self, now: Instant) -> Vec<String> {
        let resolver = Resolver::new(&self.hierarchy, &self.store);
        self.engine.commit_due(&resolver, now)
    }

    pub fn cancel_pending(&mut self, id: &str) -> bool {
        self.engine.cancel_pending(id)
    }

    /// When the next pending selection comes due, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.engine.next_due()
    }

    /// Author one option for `id` and select it.
    pub fn add_option(&mut self, id: &str, label: &str) -> Result<DropdownOption, AuthoringError> {
        self.authoring().add_single(id, label)
    }

    /// Bulk import options for `id` from newline-separated text.
    pub fn import_options(&mut self, id: &str, raw: &str) -> Result<ImportReport, AuthoringError> {
        self.authoring().add_bulk(id, raw)
    }

    /// Retry a failed save. Returns whether a save ran.
    pub fn flush(&mut self) -> Result<bool, PersistenceError> {
        self.store.flush()
    }

    fn authoring(&mut self) -> AuthoringService<'_> {
        AuthoringService::new(
            &self.hierarchy,
            &mut self.store,
            &mut self.engine,
            &*self.notifier,
        )
    }

    fn authoring_request(&self, id: &str, value: &str) -> Option<SelectOutcome> {
        if value != ADD_NEW_SENTINEL {
            return None;
        }
        let spec = self.hierarchy.spec(id).filter(|spec| spec.creatable)?;
        let context = self
            .resolver()
            .current_context(spec, self.engine.snapshot())?;
        tracing::debug!(dropdown = id, context = %context, "authoring requested");
        Some(SelectOutcome::AuthoringRequested {
            dropdown: id.to_string(),
            context,
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("hierarchy", &self.hierarchy)
            .field("store", &self.store)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
