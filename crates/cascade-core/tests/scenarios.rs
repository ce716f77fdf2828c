//! End-to-end behavior of a cascade session.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use cascade_core::{
    AuthoringError, ConfigError, NotificationKind, NotificationLog, SelectError, SelectOutcome, SelectionState,
    Session,
};
use cascade_model::{
    ADD_NEW_SENTINEL, DropdownOption, DropdownSpec, OptionContext, Relation, SelectionSnapshot,
    Store,
};
use cascade_persistence::{MemoryBackend, StoreBackend};

fn two_level() -> Vec<DropdownSpec> {
    vec![
        DropdownSpec::new("a", "A")
            .with_seed("x", "X")
            .with_seed("y", "Y"),
        DropdownSpec::new("b", "B").child_of("a").authorable(),
    ]
}

fn devices() -> Vec<DropdownSpec> {
    vec![
        DropdownSpec::new("device", "Device")
            .with_seed("phone", "Phone")
            .with_seed("tablet", "Tablet")
            .authorable(),
        DropdownSpec::new("brand", "Brand")
            .child_of("device")
            .authorable()
            .with_seed_context(
                "phone",
                vec![
                    DropdownOption::new("apple", "Apple"),
                    DropdownOption::new("samsung", "Samsung"),
                ],
            ),
        DropdownSpec::new("series", "Series")
            .child_of("brand")
            .authorable(),
        DropdownSpec::new("model", "Model")
            .child_of("series")
            .authorable(),
    ]
}

#[test]
fn test_defaults_then_author_then_reselect_parent() {
    let backend = MemoryBackend::new();
    let mut session = Session::builder(two_level())
        .backend(backend.clone())
        .store_key("demo")
        .build()
        .unwrap();

    assert_eq!(session.snapshot().to_string(), r#"{a: "x"}"#);

    session.add_option("b", "Foo").unwrap();

    let relation = session.store().data().relation("a", "x", "b").unwrap();
    assert_eq!(relation.options, [DropdownOption::new("Foo", "Foo")]);
    assert_eq!(session.snapshot().to_string(), r#"{a: "x", b: "Foo"}"#);

    let outcome = session.select("a", "y").unwrap();
    let SelectOutcome::Committed(snapshot) = outcome else {
        panic!("expected a committed selection, got {outcome:?}");
    };
    assert_eq!(snapshot.to_string(), r#"{a: "y", b: ""}"#);
    assert!(session.options("b").unwrap().is_empty());

    session.add_option("b", "Bar").unwrap();
    assert_eq!(session.options("b").unwrap().len(), 1);
    assert!(session.store().data().relation("a", "y", "b").is_some());

    let saved = backend.stored("demo").unwrap();
    assert_eq!(&saved, session.store().data());
}

#[test]
fn test_bulk_import_reports_duplicates() {
    let log = NotificationLog::new();
    let mut session = Session::builder(two_level())
        .notifier(log.clone())
        .build()
        .unwrap();

    let report = session.import_options("b", "Red\nred\nBlue").unwrap();

    assert_eq!(report.added_count(), 2);
    assert_eq!(report.duplicates, ["red"]);
    assert_eq!(session.snapshot().get("b"), None);
    let notification = log.last().unwrap();
    assert_eq!(notification.kind, NotificationKind::Info);
    assert_eq!(
        notification.message,
        "2 option(s) added to B for X; 1 duplicate(s) skipped"
    );
}

#[test]
fn test_empty_imports_are_rejected() {
    let log = NotificationLog::new();
    let mut session = Session::builder(two_level())
        .notifier(log.clone())
        .build()
        .unwrap();

    for raw in ["", "   \n  \n"] {
        let err = session.import_options("b", raw).unwrap_err();
        assert!(matches!(err, AuthoringError::EmptyImport { .. }), "{raw:?}");
    }
    assert_eq!(log.entries().len(), 2);
    assert!(session.store().data().relations.is_empty());
}

#[test]
fn test_case_insensitive_duplicate() {
    let mut session = Session::builder(two_level()).build().unwrap();
    session.add_option("b", "apple").unwrap();

    let err = session.add_option("b", "Apple").unwrap_err();

    assert!(matches!(err, AuthoringError::AlreadyExists { ref label, .. } if label == "Apple"));
    assert_eq!(session.options("b").unwrap().len(), 1);
}

#[test]
fn test_authoring_under_unselected_parent_is_rejected() {
    let mut session = Session::builder(devices()).build().unwrap();

    let err = session.add_option("series", "Galaxy S").unwrap_err();

    assert!(matches!(
        err,
        AuthoringError::NoParentContext { ref parent, .. } if parent == "brand"
    ));
}

#[test]
fn test_deep_cascade_and_breadcrumb() {
    let mut session = Session::builder(devices()).build().unwrap();
    session.select("brand", "samsung").unwrap();
    session.add_option("series", "Galaxy S").unwrap();
    session.add_option("model", "S24 Ultra").unwrap();

    assert_eq!(
        session.selection_path("model"),
        ["Phone", "Samsung", "Galaxy S"]
    );
    assert_eq!(
        session.state("model"),
        SelectionState::Selected("S24_Ultra".into())
    );

    session.select("brand", "apple").unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.get("brand"), Some("apple"));
    assert_eq!(snapshot.entry("series"), Some(""));
    assert_eq!(snapshot.entry("model"), Some(""));
    assert_eq!(session.selection_path("model"), ["Phone", "Apple"]);
    assert!(session.options("series").unwrap().is_empty());
}

#[test]
fn test_sentinel_routes_to_authoring() {
    let mut session = Session::builder(devices()).build().unwrap();

    let outcome = session.select("brand", ADD_NEW_SENTINEL).unwrap();

    assert_eq!(
        outcome,
        SelectOutcome::AuthoringRequested {
            dropdown: "brand".into(),
            context: OptionContext::dependent("device", "phone", "brand"),
        }
    );
    assert_eq!(session.snapshot().get("brand"), None);
}

#[test]
fn test_sentinel_on_fixed_dropdown_is_rejected() {
    let mut session = Session::builder(two_level()).build().unwrap();

    let err = session.select("a", ADD_NEW_SENTINEL).unwrap_err();

    assert_eq!(err, SelectError::ReservedValue { dropdown: "a".into() });
}

#[test]
fn test_settle_delay_supersedes_earlier_request() {
    let mut session = Session::builder(two_level())
        .settle_delay(Duration::from_millis(200))
        .build()
        .unwrap();
    let t0 = Instant::now();

    session.request_select("a", "y", t0).unwrap();
    let outcome = session
        .request_select("a", "x", t0 + Duration::from_millis(100))
        .unwrap();
    let SelectOutcome::Pending { due } = outcome else {
        panic!("expected a pending selection, got {outcome:?}");
    };
    assert_eq!(due, t0 + Duration::from_millis(300));
    assert_eq!(session.next_due(), Some(due));

    assert!(session.commit_due(t0 + Duration::from_millis(250)).is_empty());
    assert_eq!(session.commit_due(due), ["a"]);
    assert_eq!(session.snapshot().get("a"), Some("x"));
}

#[test]
fn test_listeners_see_every_commit() {
    let selections = Rc::new(RefCell::new(Vec::new()));
    let stores = Rc::new(RefCell::new(Vec::new()));
    let selection_sink = Rc::clone(&selections);
    let store_sink = Rc::clone(&stores);

    let mut session = Session::builder(two_level())
        .on_selection_change(move |snapshot: &SelectionSnapshot| {
            selection_sink.borrow_mut().push(snapshot.clone());
        })
        .on_data_change(move |store: &Store| {
            store_sink.borrow_mut().push(store.option_count());
        })
        .build()
        .unwrap();
    session.add_option("b", "Foo").unwrap();
    session.import_options("b", "Bar\nBaz").unwrap();

    assert_eq!(selections.borrow().len(), 2);
    assert_eq!(*stores.borrow(), [1, 3]);
}

#[test]
fn test_save_failure_is_reported_and_retried() {
    let backend = MemoryBackend::new();
    let log = NotificationLog::new();
    let mut session = Session::builder(two_level())
        .backend(backend.clone())
        .notifier(log.clone())
        .build()
        .unwrap();
    backend.fail_saves(true);

    let err = session.add_option("b", "Foo").unwrap_err();

    assert!(matches!(err, AuthoringError::PersistenceFailure { .. }));
    assert_eq!(session.snapshot().get("b"), Some("Foo"));
    assert_eq!(log.last().unwrap().kind, NotificationKind::Error);
    assert!(backend.stored("options").is_none());

    backend.fail_saves(false);
    assert!(session.flush().unwrap());
    assert_eq!(backend.stored("options").as_ref(), Some(session.store().data()));
}

#[test]
fn test_load_failure_falls_back_to_seeds() {
    let backend = MemoryBackend::new();
    backend.fail_loads(true);
    let log = NotificationLog::new();

    let session = Session::builder(two_level())
        .backend(backend)
        .notifier(log.clone())
        .build()
        .unwrap();

    assert_eq!(session.snapshot().get("a"), Some("x"));
    let notification = log.last().unwrap();
    assert_eq!(notification.title, "Could not load saved options");
    assert_eq!(
        notification.message,
        "Option storage is unavailable: load failure injected. Starting from defaults."
    );
}

#[test]
fn test_existing_store_is_loaded() {
    let mut store = Store::new();
    store
        .root_options
        .insert("a".into(), vec![DropdownOption::new("z", "Z")]);
    let mut relation = Relation::new("a", "z", "b");
    relation.options.push(DropdownOption::from_label("Kept"));
    store.relations.push(relation);
    let backend = MemoryBackend::with_store("options", store);

    let session = Session::builder(two_level())
        .backend(backend)
        .build()
        .unwrap();

    assert_eq!(session.snapshot().get("a"), Some("z"));
    assert_eq!(session.options("b").unwrap().len(), 1);
}

#[test]
fn test_file_backend_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let backend = cascade_persistence::JsonFileBackend::new(dir.path());

    let mut session = Session::builder(devices())
        .backend(backend.clone())
        .store_key("devices")
        .build()
        .unwrap();
    session.import_options("brand", "Google\nOnePlus").unwrap();
    let expected = session.store().data().clone();
    drop(session);

    assert_eq!(backend.load("devices").unwrap(), Some(expected));

    let session = Session::builder(devices())
        .backend(backend)
        .store_key("devices")
        .build()
        .unwrap();
    assert_eq!(session.options("brand").unwrap().len(), 4);
}

#[test]
fn test_duplicate_root_seeds_are_rejected() {
    let specs = vec![
        DropdownSpec::new("a", "A")
            .with_seed("apple", "Apple")
            .with_seed("APPLE", "apple")
            .authorable(),
    ];

    let err = Session::builder(specs).build().unwrap_err();

    assert!(matches!(err, ConfigError::DuplicateSeed { ref id, .. } if id == "a"));
}

#[test]
fn test_option_authored_into_seeded_root_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let backend = cascade_persistence::JsonFileBackend::new(dir.path());
    let log = NotificationLog::new();
    let specs = || {
        vec![
            DropdownSpec::new("a", "A")
                .with_seed("apple", "Apple")
                .with_seed("banana", "Banana")
                .authorable(),
        ]
    };

    let mut session = Session::builder(specs())
        .backend(backend.clone())
        .build()
        .unwrap();
    session.add_option("a", "Pear").unwrap();
    drop(session);

    let session = Session::builder(specs())
        .backend(backend)
        .notifier(log.clone())
        .build()
        .unwrap();

    let labels: Vec<_> = session
        .options("a")
        .unwrap()
        .iter()
        .map(|option| option.label.as_str())
        .collect();
    assert_eq!(labels, ["Apple", "Banana", "Pear"]);
    assert!(
        log.entries()
            .iter()
            .all(|entry| entry.kind != NotificationKind::Error)
    );
}
