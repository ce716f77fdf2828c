//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use cascade_cli::render::{
    breadcrumb, import_summary, options_table, render_hierarchy, render_store, snapshot_table,
};
use cascade_cli::setup::{apply_selections, open_session, read_import_source};
use cascade_core::{CascadeConfig, Hierarchy, SelectOutcome, Session};

/// Where a command finds its configuration and store.
pub struct Inputs<'a> {
    pub config: &'a Path,
    pub store_dir: &'a Path,
    pub selections: &'a [(String, String)],
}

impl Inputs<'_> {
    fn session(&self) -> Result<Session> {
        let mut session = open_session(self.config, self.store_dir)?;
        apply_selections(&mut session, self.selections)?;
        Ok(session)
    }
}

pub fn run_check(config: &Path) -> Result<()> {
    let config = CascadeConfig::load_from(config)
        .with_context(|| format!("load configuration {}", config.display()))?;
    let count = config.dropdowns.len();
    let hierarchy = Hierarchy::new(config.dropdowns).context("validate dropdowns")?;
    println!("{}", render_hierarchy(&hierarchy));
    println!();
    println!("{count} dropdown(s), configuration is valid");
    Ok(())
}

pub fn run_options(inputs: &Inputs<'_>, dropdown: &str) -> Result<()> {
    let session = inputs.session()?;
    let options = session
        .options(dropdown)
        .ok_or_else(|| anyhow!("unknown dropdown '{dropdown}'"))?;
    let resolver = session.resolver();
    println!("{}", breadcrumb(&resolver, dropdown, session.snapshot()));
    if options.is_empty() {
        println!("No options available here yet.");
        return Ok(());
    }
    println!(
        "{}",
        options_table(options, session.snapshot().get(dropdown))
    );
    Ok(())
}

pub fn run_select(inputs: &Inputs<'_>, dropdown: &str, value: &str) -> Result<()> {
    let mut session = inputs.session()?;
    let outcome = session
        .select(dropdown, value)
        .with_context(|| format!("select {dropdown}={value}"))?;
    if let SelectOutcome::AuthoringRequested { context, .. } = outcome {
        println!("Adding a new option to {context}; use `cascade add {dropdown} <LABEL>`.");
        return Ok(());
    }
    print_selection(&session, dropdown);
    Ok(())
}

pub fn run_add(inputs: &Inputs<'_>, dropdown: &str, label: &str) -> Result<()> {
    let mut session = inputs.session()?;
    let option = session
        .add_option(dropdown, label)
        .with_context(|| format!("add '{label}' to {dropdown}"))?;
    println!("Added {} [{}]", option.label, option.value);
    print_selection(&session, dropdown);
    Ok(())
}

pub fn run_import(inputs: &Inputs<'_>, dropdown: &str, source: &Path) -> Result<()> {
    let text = read_import_source(source)?;
    let mut session = inputs.session()?;
    let report = session
        .import_options(dropdown, &text)
        .with_context(|| format!("import into {dropdown}"))?;
    println!("{}", import_summary(&report));
    Ok(())
}

pub fn run_show(inputs: &Inputs<'_>) -> Result<()> {
    let session = inputs.session()?;
    println!("{}", render_store(session.hierarchy(), session.store()));
    Ok(())
}

fn print_selection(session: &Session, dropdown: &str) {
    let resolver = session.resolver();
    println!("{}", breadcrumb(&resolver, dropdown, session.snapshot()));
    println!("{}", snapshot_table(&resolver, session.snapshot()));
}
