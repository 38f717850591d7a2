use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sphincter_cli::pipeline::{InspectSummary, PrepareResult, VariantStatus};

pub fn print_prepare_summary(result: &PrepareResult) {
    if result.dry_run {
        println!("Dry run: nothing written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Source"),
        header_cell("Rows"),
        header_cell("Mice"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_rows = 0usize;
    let mut errors = Vec::new();
    for summary in &result.variants {
        total_rows += summary.rows.unwrap_or(0);
        if let VariantStatus::Failed { error } = &summary.status {
            errors.push(format!("{}: {error}", summary.name));
        }
        table.add_row(vec![
            Cell::new(&summary.name).add_attribute(Attribute::Bold),
            Cell::new(summary.source),
            count_cell(summary.rows),
            count_cell(summary.subjects),
            status_cell(&summary.status),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        failed_cell(result.failed_count()),
    ]);
    println!("{table}");

    if !errors.is_empty() {
        eprintln!("Errors:");
        for error in &errors {
            eprintln!("- {error}");
        }
    }
}

/// Prints one row per file and returns whether any file was rejected.
pub fn print_inspect_summary(summaries: &[InspectSummary]) -> bool {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Mice"),
        header_cell("Coordinates"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut errors = Vec::new();
    for summary in summaries {
        let file = Cell::new(summary.path.display());
        match &summary.outcome {
            Ok(overview) => {
                let coordinates: Vec<String> = overview
                    .dimensions
                    .iter()
                    .map(|(name, count)| format!("{name} ({count})"))
                    .collect();
                table.add_row(vec![
                    file,
                    Cell::new(&overview.name).add_attribute(Attribute::Bold),
                    Cell::new(overview.rows),
                    Cell::new(overview.columns),
                    Cell::new(overview.subjects),
                    Cell::new(coordinates.join(", ")),
                ]);
            }
            Err(error) => {
                errors.push(format!("{}: {error}", summary.path.display()));
                table.add_row(vec![
                    file,
                    Cell::new("rejected").fg(Color::Red).add_attribute(Attribute::Bold),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                ]);
            }
        }
    }
    println!("{table}");

    if !errors.is_empty() {
        eprintln!("Errors:");
        for error in &errors {
            eprintln!("- {error}");
        }
    }
    !errors.is_empty()
}

fn status_cell(status: &VariantStatus) -> Cell {
    match status {
        VariantStatus::Written { path } => Cell::new(path.display()).fg(Color::Green),
        VariantStatus::Checked => Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
        VariantStatus::Failed { .. } => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn failed_cell(failed: usize) -> Cell {
    if failed == 0 {
        dim_cell("0 failed")
    } else {
        Cell::new(format!("{failed} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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
    Cell::new(value).add_attribute(Attribute::Dim)
}
