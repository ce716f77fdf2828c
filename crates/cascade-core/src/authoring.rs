//! Runtime authoring of new options, one at a time or by bulk import.

use cascade_model::{DropdownOption, DropdownSpec, OptionContext};

use crate::cascade::CascadeEngine;
use crate::error::{AuthoringError, StoreError};
use crate::hierarchy::Hierarchy;
use crate::notify::{NotificationKind, Notifier};
use crate::resolver::Resolver;
use crate::store::OptionStore;

/// Outcome of a bulk import that added at least one option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Options inserted, in input order.
    pub added: Vec<DropdownOption>,

    /// Lines skipped because they matched an existing or earlier line.
    pub duplicates: Vec<String>,

    /// Lines skipped because they derive to the add-new sentinel.
    pub reserved: Vec<String>,
}

impl ImportReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}

/// Split import text into trimmed, non-blank lines.
pub fn parse_import_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Adds options to the store on behalf of a user.
///
/// Borrows the session's parts for the duration of one request. Every
/// outcome is reported through the notifier.
pub struct AuthoringService<'a> {
    hierarchy: &'a Hierarchy,
    store: &'a mut OptionStore,
    engine: &'a mut CascadeEngine,
    notifier: &'a dyn Notifier,
}

impl<'a> AuthoringService<'a> {
    pub fn new(
        hierarchy: &'a Hierarchy,
        store: &'a mut OptionStore,
        engine: &'a mut CascadeEngine,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            hierarchy,
            store,
            engine,
            notifier,
        }
    }

    /// Add one option under the dropdown's current context and select it.
    ///
    /// The insert and the creation of empty child contexts for the new value
    /// are one store mutation. The selection then clears all descendants.
    ///
    /// # Errors
    ///
    /// Validation failures leave store and selection untouched.
    /// [`AuthoringError::PersistenceFailure`] means the option was added and
    /// selected but the save failed.
    pub fn add_single(&mut self, id: &str, label: &str) -> Result<DropdownOption, AuthoringError> {
        let _span = tracing::info_span!("add_single", dropdown = id).entered();
        let result = self.try_add_single(id, label);
        match &result {
            Ok(option) => {
                let context = self.describe_current(id);
                self.notifier.notify(
                    NotificationKind::Info,
                    "Option added",
                    &format!("'{}' was added to {context}", option.label),
                );
            }
            Err(e) => self.report(e),
        }
        result
    }

    /// Add every new line of `raw` under the dropdown's current context.
    ///
    /// Each line is checked against the options already present plus the
    /// lines accepted before it. Duplicates and reserved lines are skipped
    /// and reported. The selection is not changed.
    ///
    /// # Errors
    ///
    /// `EmptyImport` when no line has content, `NoNewOptions` when every line
    /// was skipped. Neither changes the store.
    pub fn add_bulk(&mut self, id: &str, raw: &str) -> Result<ImportReport, AuthoringError> {
        let _span = tracing::info_span!("add_bulk", dropdown = id).entered();
        let result = self.try_add_bulk(id, raw);
        match &result {
            Ok(report) => {
                let context = self.describe_current(id);
                let mut message = format!("{} option(s) added to {context}", report.added_count());
                if !report.duplicates.is_empty() {
                    message.push_str(&format!(
                        "; {} duplicate(s) skipped",
                        report.duplicates.len()
                    ));
                }
                if !report.reserved.is_empty() {
                    message.push_str(&format!("; {} reserved skipped", report.reserved.len()));
                }
                self.notifier
                    .notify(NotificationKind::Info, "Options imported", &message);
            }
            Err(e) => self.report(e),
        }
        result
    }

    fn try_add_single(&mut self, id: &str, label: &str) -> Result<DropdownOption, AuthoringError> {
        let hierarchy = self.hierarchy;
        let spec = authorable_spec(hierarchy, id)?;

        if label.trim().is_empty() {
            return Err(AuthoringError::EmptyLabel {
                dropdown: id.to_string(),
            });
        }
        let context = self.context_for(spec)?;
        let option = DropdownOption::from_label(label);
        if option.is_reserved() {
            return Err(AuthoringError::ReservedValue {
                dropdown: id.to_string(),
                label: option.label,
            });
        }

        let children = hierarchy.children_of(id);
        let committed = self
            .store
            .transact(|draft| {
                draft.insert_option(&context, option.clone())?;
                draft.ensure_child_contexts_exist(id, &option.value, children);
                Ok::<_, StoreError>(())
            })
            .map_err(from_store_error)?;
        tracing::info!(context = %context, value = %option.value, "option added");

        let resolver = Resolver::new(hierarchy, &*self.store);
        self.engine.select(&resolver, id, &option.value)?;

        committed
            .saved
            .map_err(|source| AuthoringError::PersistenceFailure { source })?;
        Ok(option)
    }

    fn try_add_bulk(&mut self, id: &str, raw: &str) -> Result<ImportReport, AuthoringError> {
        let hierarchy = self.hierarchy;
        let spec = authorable_spec(hierarchy, id)?;

        let lines = parse_import_lines(raw);
        if lines.is_empty() {
            return Err(AuthoringError::EmptyImport {
                dropdown: id.to_string(),
            });
        }
        let context = self.context_for(spec)?;

        let children = hierarchy.children_of(id);
        let committed = self.store.transact(|draft| {
            let mut report = ImportReport::default();
            for line in lines {
                let option = DropdownOption::from_label(line);
                if option.is_reserved() {
                    report.reserved.push(line.to_string());
                    continue;
                }
                match draft.insert_option(&context, option.clone()) {
                    Ok(()) => {
                        draft.ensure_child_contexts_exist(id, &option.value, children);
                        report.added.push(option);
                    }
                    Err(StoreError::AlreadyExists { .. }) => {
                        report.duplicates.push(line.to_string());
                    }
                    Err(e) => return Err(from_store_error(e)),
                }
            }
            if report.added.is_empty() {
                return Err(AuthoringError::NoNewOptions {
                    dropdown: id.to_string(),
                    duplicates: report.duplicates,
                    reserved: report.reserved,
                });
            }
            Ok(report)
        })?;
        tracing::info!(
            context = %context,
            added = committed.value.added_count(),
            duplicates = committed.value.duplicates.len(),
            "options imported"
        );

        committed
            .into_result()
            .map_err(|source| AuthoringError::PersistenceFailure { source })
    }

    fn context_for(&self, spec: &DropdownSpec) -> Result<OptionContext, AuthoringError> {
        let resolver = Resolver::new(self.hierarchy, &*self.store);
        resolver
            .current_context(spec, self.engine.snapshot())
            .ok_or_else(|| AuthoringError::NoParentContext {
                dropdown: spec.id.clone(),
                parent: spec.depends_on.clone().unwrap_or_default(),
            })
    }

    fn describe_current(&self, id: &str) -> String {
        let resolver = Resolver::new(self.hierarchy, &*self.store);
        let snapshot = self.engine.snapshot();
        self.hierarchy
            .spec(id)
            .and_then(|spec| resolver.current_context(spec, snapshot))
            .map_or_else(
                || id.to_string(),
                |context| resolver.describe_context(&context, snapshot),
            )
    }

    fn report(&self, error: &AuthoringError) {
        tracing::warn!(error = %error, "authoring failed");
        self.notifier
            .notify(NotificationKind::Error, error.title(), &error.to_string());
    }
}

fn authorable_spec<'h>(hierarchy: &'h Hierarchy, id: &str) -> Result<&'h DropdownSpec, AuthoringError> {
    let spec = hierarchy
        .spec(id)
        .ok_or_else(|| AuthoringError::UnknownDropdown { id: id.to_string() })?;
    if !spec.creatable {
        return Err(AuthoringError::NotCreatable {
            dropdown: id.to_string(),
        });
    }
    Ok(spec)
}

fn from_store_error(error: StoreError) -> AuthoringError {
    match error {
        StoreError::AlreadyExists { context, label } => {
            AuthoringError::AlreadyExists { context, label }
        }
        StoreError::Persistence(source) => AuthoringError::PersistenceFailure { source },
    }
}
