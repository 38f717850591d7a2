use std::collections::HashMap;

use polars::prelude::{AnyValue, Column, DataFrame};
use sphincter_model::{
    PrepError, Result, Schema, SchemaError, SchemaViolation, ViolationReason,
};
use tracing::debug;

use crate::coerce::{Cell, build_column, check_cell, coerce_cell};

/// Validates a table against a schema and returns the coerced table.
///
/// The result holds the declared columns, coerced and in schema order,
/// followed by any extra columns untouched. Every violation in the table is
/// collected; if there is at least one, the whole table is rejected.
pub fn validate_and_coerce(table: &DataFrame, schema: &Schema) -> Result<DataFrame> {
    let mut violations = Vec::new();
    let mut columns: Vec<Column> = Vec::with_capacity(table.width());

    for spec in schema.columns() {
        let Ok(source) = table.column(&spec.name) else {
            violations.push(SchemaViolation::missing_column(&spec.name));
            continue;
        };
        let mut cells = Vec::with_capacity(table.height());
        let mut seen: HashMap<String, usize> = HashMap::new();
        for row in 0..table.height() {
            let value = source.get(row).unwrap_or(AnyValue::Null);
            let cell = match coerce_cell(value, &spec.column_type) {
                Ok(cell) => cell,
                Err(reason) => {
                    violations.push(SchemaViolation::at(&spec.name, row, reason));
                    cells.push(Cell::Missing);
                    continue;
                }
            };
            for reason in check_cell(&cell, spec) {
                violations.push(SchemaViolation::at(&spec.name, row, reason));
            }
            if spec.unique
                && let Some(key) = cell.key()
            {
                if let Some(&first_row) = seen.get(&key) {
                    let reason = ViolationReason::Duplicate {
                        value: key,
                        first_row,
                    };
                    violations.push(SchemaViolation::at(&spec.name, row, reason));
                } else {
                    seen.insert(key, row);
                }
            }
            cells.push(cell);
        }
        columns.push(build_column(&spec.name, &spec.column_type, cells));
    }

    if !violations.is_empty() {
        debug!(
            schema = schema.name(),
            violations = violations.len(),
            "table rejected"
        );
        return Err(PrepError::SchemaViolation(SchemaError::new(
            schema.name(),
            violations,
        )));
    }

    for column in table.get_columns() {
        if schema.column(column.name().as_str()).is_none() {
            columns.push(column.clone());
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Keeps only the declared columns, in schema order.
pub fn project(table: &DataFrame, schema: &Schema) -> Result<DataFrame> {
    Ok(table.select(schema.column_names())?)
}
