//! Collaborator seams: user notifications and change listeners.
//!
//! The core never renders anything. It reports feedback through a
//! [`Notifier`] and announces committed changes to [`SelectionListener`]s
//! and [`DataListener`]s. Plain closures implement all three traits.

use std::fmt;
use std::sync::{Arc, Mutex};

use cascade_model::{SelectionSnapshot, Store};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Fire-and-forget user feedback (toasts, status lines, logs).
pub trait Notifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(NotificationKind, &str, &str),
{
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        self(kind, title, message);
    }
}

/// Receives the full snapshot after every committed selection.
pub trait SelectionListener {
    fn on_selection_change(&self, snapshot: &SelectionSnapshot);
}

impl<F> SelectionListener for F
where
    F: Fn(&SelectionSnapshot),
{
    fn on_selection_change(&self, snapshot: &SelectionSnapshot) {
        self(snapshot);
    }
}

/// Receives the full store after every committed mutation.
pub trait DataListener {
    fn on_data_change(&self, store: &Store);
}

impl<F> DataListener for F
where
    F: Fn(&Store),
{
    fn on_data_change(&self, store: &Store) {
        self(store);
    }
}

/// Notifier that writes to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        match kind {
            NotificationKind::Info => tracing::info!(title, "{message}"),
            NotificationKind::Error => tracing::warn!(title, "{message}"),
        }
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

/// Notifier that keeps every notification for later display.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.last().cloned())
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        tracing::debug!(%kind, title, "{message}");
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Notification {
                kind,
                title: title.to_string(),
                message: message.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_log_records_in_order() {
        let log = NotificationLog::new();
        let shared = log.clone();
        shared.notify(NotificationKind::Info, "Added", "Foo added");
        shared.notify(NotificationKind::Error, "Already exists", "Foo exists");

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].title, "Added");
        assert_eq!(log.last().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn test_closures_are_listeners() {
        let calls = Cell::new(0);
        let listener = |snapshot: &SelectionSnapshot| {
            assert!(!snapshot.has_selection());
            calls.set(calls.get() + 1);
        };
        listener.on_selection_change(&SelectionSnapshot::new());
        assert_eq!(calls.get(), 1);
    }
}
