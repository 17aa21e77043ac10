use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use rdp_model::Workspace;
use rdp_source::{SourceColumn, SourceType};
use rdp_standards::{grouping_keys, grouping_levels};

pub fn print_stage_summary(workspace: &Workspace) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Source Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_rows = 0usize;
    for frame in workspace.iter() {
        total_rows += frame.record_count();
        table.add_row(vec![
            name_cell(&frame.name),
            source_cell(frame.source_table.as_deref()),
            Cell::new(frame.record_count()),
            Cell::new(frame.column_count()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

/// Renders the first `limit` rows of a dataset.
pub fn frame_table(data: &DataFrame, limit: usize) -> Table {
    let mut table = Table::new();
    let header: Vec<Cell> = data
        .get_columns()
        .iter()
        .map(|column| header_cell(column.name().as_str()))
        .collect();
    table.set_header(header);
    apply_table_style(&mut table);
    let rows = data.height().min(limit);
    for idx in 0..rows {
        let mut cells = Vec::with_capacity(data.width());
        for column in data.get_columns() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            cells.push(value_cell(&value));
        }
        table.add_row(cells);
    }
    table
}

pub fn tables_table(names: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table")]);
    apply_table_style(&mut table);
    for name in names {
        table.add_row(vec![Cell::new(name)]);
    }
    table
}

pub fn columns_table(columns: &[SourceColumn]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (position, column) in columns.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&column.name),
            type_cell(column.kind),
        ]);
    }
    table
}

pub fn keys_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Level"), header_cell("Sort Keys")]);
    apply_table_style(&mut table);
    for level in grouping_levels() {
        let keys = grouping_keys(level).unwrap_or_default();
        table.add_row(vec![name_cell(level), Cell::new(keys.join(", "))]);
    }
    table
}

fn value_cell(value: &AnyValue) -> Cell {
    match value {
        AnyValue::Null => dim_cell("-"),
        AnyValue::String(text) => Cell::new(*text),
        AnyValue::StringOwned(text) => Cell::new(text.as_str()),
        other => Cell::new(other.to_string()),
    }
}

fn type_cell(kind: SourceType) -> Cell {
    match kind {
        // Temporal columns get truncated during normalization.
        SourceType::Date | SourceType::Timestamp => Cell::new(kind.as_str()).fg(Color::Yellow),
        _ => Cell::new(kind.as_str()),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
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

fn name_cell(name: &str) -> Cell {
    Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold)
}

fn source_cell(table: Option<&str>) -> Cell {
    match table {
        Some(name) => Cell::new(name),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
