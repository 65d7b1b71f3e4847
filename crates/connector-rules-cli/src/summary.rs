use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use connector_rules::{ConnectorType, RuleStore, ValidationAction};
use connector_rules_cli::batch::{BatchReport, FileOutcome, FileReport};

pub fn print_report(report: &BatchReport) {
    if report.files.is_empty() {
        println!("No .json files to validate");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Type"),
        header_cell("Status"),
        header_cell("Issues"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for file in &report.files {
        table.add_row(vec![
            Cell::new(&file.file),
            type_cell(file.connector_type),
            status_cell(&file.outcome),
            count_cell(file.issues().len()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!(
            "{} accepted, {} skipped",
            report.accepted_count(),
            report.skipped_count()
        ))
        .add_attribute(Attribute::Bold),
        count_cell(report.files.iter().map(|file| file.issues().len()).sum()),
    ]);
    println!("{table}");
    print_skipped(report);
}

fn print_skipped(report: &BatchReport) {
    let skipped: Vec<&FileReport> = report
        .files
        .iter()
        .filter(|file| !file.is_accepted())
        .collect();
    if skipped.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("Skipped configurations:");
    for file in skipped {
        eprintln!("- {}", file.file);
        for issue in file.issues() {
            eprintln!("    {issue}");
        }
    }
}

pub fn print_rules(connector_type: ConnectorType, store: &RuleStore) {
    println!("Connector type: {connector_type}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Action"),
        header_cell("Constraint"),
        header_cell("Source"),
        header_cell("Importance"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for rule in store.iter() {
        table.add_row(vec![
            Cell::new(&rule.name),
            action_cell(rule.action),
            optional_cell(rule.constraint()),
            optional_cell(store.source_of(&rule.name)),
            optional_cell(rule.meta.importance.as_deref()),
        ]);
    }
    println!("{table}");

    let mut summary = Table::new();
    summary.set_header(vec![header_cell("Action"), header_cell("Rules")]);
    apply_table_style(&mut summary);
    align_column(&mut summary, 1, CellAlignment::Right);
    for (action, count) in store.action_summary() {
        summary.add_row(vec![action_cell(action), Cell::new(count)]);
    }
    summary.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(store.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{summary}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ]);
    }
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

fn type_cell(connector_type: Option<ConnectorType>) -> Cell {
    match connector_type {
        Some(connector_type) => Cell::new(connector_type).fg(Color::Blue),
        None => dim_cell("-"),
    }
}

fn status_cell(outcome: &FileOutcome) -> Cell {
    match outcome {
        FileOutcome::Accepted => Cell::new("✓ accepted")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        FileOutcome::Rejected { .. } => Cell::new("✗ rejected").fg(Color::Red),
        FileOutcome::Unreadable { .. } => Cell::new("✗ unreadable").fg(Color::Yellow),
    }
}

fn action_cell(action: ValidationAction) -> Cell {
    let color = match action {
        ValidationAction::Require => Color::Green,
        ValidationAction::Disallow => Color::Red,
        ValidationAction::AllowDefault | ValidationAction::AllowValues => Color::Yellow,
        ValidationAction::Ignore | ValidationAction::Allow => Color::DarkGrey,
    };
    Cell::new(action).fg(color)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
