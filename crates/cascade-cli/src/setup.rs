//! Session setup shared by every subcommand.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cascade_core::{CascadeConfig, NotificationKind, SelectOutcome, Session};
use cascade_persistence::JsonFileBackend;

/// Directory used when no platform data directory is available.
pub const FALLBACK_STORE_DIR: &str = ".cascade";

/// Parse a `dropdown=value` pair.
pub fn parse_selection(raw: &str) -> Result<(String, String), String> {
    let Some((id, value)) = raw.split_once('=') else {
        return Err(format!("expected DROPDOWN=VALUE, got '{raw}'"));
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing dropdown id in '{raw}'"));
    }
    Ok((id.to_string(), value.trim().to_string()))
}

/// Platform data directory for stored options.
pub fn default_store_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "OptionCascade", "cascade")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STORE_DIR))
}

/// Load the configuration at `config` and open a session persisted in `store_dir`.
///
/// Notifications go to stderr.
pub fn open_session(config: &Path, store_dir: &Path) -> Result<Session> {
    let config = CascadeConfig::load_from(config)
        .with_context(|| format!("load configuration {}", config.display()))?;
    Session::from_config(config)
        .backend(JsonFileBackend::new(store_dir))
        .notifier(|kind: NotificationKind, title: &str, message: &str| {
            eprintln!("{kind}: {title}: {message}");
        })
        .build()
        .context("build session")
}

/// Apply `dropdown=value` selections in order.
pub fn apply_selections(session: &mut Session, selections: &[(String, String)]) -> Result<()> {
    for (id, value) in selections {
        match session
            .select(id, value)
            .with_context(|| format!("select {id}={value}"))?
        {
            SelectOutcome::Committed(_) => {}
            SelectOutcome::Pending { .. } | SelectOutcome::AuthoringRequested { .. } => {
                bail!("{id}={value} did not commit a selection");
            }
        }
    }
    Ok(())
}

/// Read import text from a file, or stdin when `source` is `-`.
pub fn read_import_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read import text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("read {}", source.display()))
}
