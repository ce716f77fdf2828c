//! Integration tests for session setup from configuration files.

use std::fs;
use std::path::Path;

use cascade_cli::render::render_store;
use cascade_cli::setup::{apply_selections, open_session, read_import_source};

const CONFIG: &str = r#"
[session]
store_key = "devices"

[[dropdown]]
id = "device"
label = "Device"
seed_options = ["Phone", "Tablet"]

[[dropdown]]
id = "brand"
label = "Brand"
depends_on = "device"
creatable = true

[dropdown.seed_contexts]
Phone = ["Apple"]
"#;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("cascade.toml");
    fs::write(&path, CONFIG).unwrap();
    path
}

fn selection(id: &str, value: &str) -> (String, String) {
    (id.to_string(), value.to_string())
}

#[test]
fn test_added_options_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let store_dir = dir.path().join("store");

    let mut session = open_session(&config, &store_dir).unwrap();
    apply_selections(&mut session, &[selection("device", "Tablet")]).unwrap();
    session.add_option("brand", "Lenovo").unwrap();
    drop(session);

    assert!(store_dir.join("devices.json").exists());

    let mut session = open_session(&config, &store_dir).unwrap();
    apply_selections(
        &mut session,
        &[selection("device", "Tablet"), selection("brand", "Lenovo")],
    )
    .unwrap();
    assert_eq!(session.snapshot().get("brand"), Some("Lenovo"));

    insta::assert_snapshot!(render_store(session.hierarchy(), session.store()), @r"
    device
    ├── Phone [Phone]
    └── Tablet [Tablet]
    brand · device = Phone
    └── Apple [Apple]
    brand · device = Tablet
    └── Lenovo [Lenovo]
    ");
}

#[test]
fn test_invalid_selection_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let mut session = open_session(&config, &dir.path().join("store")).unwrap();

    let err = apply_selections(&mut session, &[selection("brand", "Nokia")]).unwrap_err();

    assert!(format!("{err:#}").contains("select brand=Nokia"));
}

#[test]
fn test_missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_session(&dir.path().join("absent.toml"), dir.path()).unwrap_err();
    assert!(err.to_string().starts_with("load configuration"));
}

#[test]
fn test_cyclic_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cycle.toml");
    fs::write(
        &path,
        r#"
[[dropdown]]
id = "a"
label = "A"
depends_on = "b"

[[dropdown]]
id = "b"
label = "B"
depends_on = "a"
"#,
    )
    .unwrap();

    let err = open_session(&path, dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Dependency cycle"));
}

#[test]
fn test_read_import_source_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brands.txt");
    fs::write(&path, "Apple\n\nSamsung\n").unwrap();

    assert_eq!(read_import_source(&path).unwrap(), "Apple\n\nSamsung\n");
    assert!(read_import_source(&dir.path().join("nope.txt")).is_err());
}
