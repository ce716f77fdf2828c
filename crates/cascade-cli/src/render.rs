//! Text and table rendering for command output.

use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cascade_core::{Hierarchy, ImportReport, OptionStore, Resolver};
use cascade_model::{DropdownOption, OptionContext, SelectionSnapshot};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Dropdown tree, one root per top-level line.
pub fn render_hierarchy(hierarchy: &Hierarchy) -> String {
    let mut lines = Vec::new();
    for root in hierarchy.roots() {
        lines.push(dropdown_line(hierarchy, &root.id));
        push_children(hierarchy, &root.id, "", &mut lines);
    }
    lines.join("\n")
}

fn push_children(hierarchy: &Hierarchy, id: &str, prefix: &str, lines: &mut Vec<String>) {
    let children = hierarchy.children_of(id);
    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == children.len();
        let branch = if last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{prefix}{branch}{}", dropdown_line(hierarchy, child)));
        let next = format!("{prefix}{}", if last { SPACE } else { PIPE });
        push_children(hierarchy, child, &next, lines);
    }
}

fn dropdown_line(hierarchy: &Hierarchy, id: &str) -> String {
    let Some(spec) = hierarchy.spec(id) else {
        return id.to_string();
    };
    let mut line = format!("{} ({})", spec.id, spec.label);
    if spec.creatable {
        line.push_str(" [creatable]");
    }
    line
}

/// Every stored option set, in dropdown configuration order.
///
/// Root dropdowns without stored options show their seeds.
pub fn render_store(hierarchy: &Hierarchy, store: &OptionStore) -> String {
    let mut lines = Vec::new();
    for spec in hierarchy.specs() {
        if spec.is_root() {
            lines.push(spec.id.clone());
            push_options(store.get_options(&OptionContext::root(&spec.id)), &mut lines);
            continue;
        }
        for relation in store.data().relations.iter().filter(|r| r.child == spec.id) {
            lines.push(format!(
                "{} · {} = {}",
                relation.child, relation.parent, relation.parent_value
            ));
            push_options(&relation.options, &mut lines);
        }
    }
    lines.join("\n")
}

fn push_options(options: &[DropdownOption], lines: &mut Vec<String>) {
    if options.is_empty() {
        lines.push(format!("{LAST_BRANCH}(empty)"));
        return;
    }
    for (index, option) in options.iter().enumerate() {
        let branch = if index + 1 == options.len() {
            LAST_BRANCH
        } else {
            BRANCH
        };
        lines.push(format!("{branch}{} [{}]", option.label, option.value));
    }
}

/// Breadcrumb above `id` followed by the dropdown's own label.
pub fn breadcrumb(resolver: &Resolver<'_>, id: &str, snapshot: &SelectionSnapshot) -> String {
    let mut parts = resolver.selection_path(id, snapshot);
    if let Some(spec) = resolver.hierarchy().spec(id) {
        parts.push(spec.label.clone());
    }
    parts.join(" > ")
}

/// Table of the options offered for `id`, marking the selected one.
pub fn options_table(options: &[DropdownOption], selected: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Value"),
        header_cell("Label"),
        header_cell("Selected"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for option in options {
        let marker = if selected == Some(option.value.as_str()) {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(&option.value),
            Cell::new(&option.label),
            marker,
        ]);
    }
    table
}

/// Table of every dropdown and its current value, in configuration order.
pub fn snapshot_table(resolver: &Resolver<'_>, snapshot: &SelectionSnapshot) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dropdown"),
        header_cell("Value"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    for spec in resolver.hierarchy().specs() {
        let row = match snapshot.get(&spec.id) {
            Some(value) => vec![
                Cell::new(&spec.label),
                Cell::new(value),
                Cell::new(resolver.label_of(spec, snapshot, value)),
            ],
            None => vec![Cell::new(&spec.label), dim_cell("-"), dim_cell("-")],
        };
        table.add_row(row);
    }
    table
}

/// One-paragraph summary of a bulk import.
pub fn import_summary(report: &ImportReport) -> String {
    let mut out = String::new();
    let _ = write!(out, "Added {} option(s)", report.added_count());
    if !report.added.is_empty() {
        let labels: Vec<&str> = report.added.iter().map(|o| o.label.as_str()).collect();
        let _ = write!(out, ": {}", labels.join(", "));
    }
    if !report.duplicates.is_empty() {
        let _ = write!(
            out,
            "\nSkipped {} duplicate(s): {}",
            report.duplicates.len(),
            report.duplicates.join(", ")
        );
    }
    if !report.reserved.is_empty() {
        let _ = write!(
            out,
            "\nSkipped {} reserved line(s): {}",
            report.reserved.len(),
            report.reserved.join(", ")
        );
    }
    out
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
