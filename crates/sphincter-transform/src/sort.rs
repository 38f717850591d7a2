//! Deterministic row order.
//!
//! Rows are ordered by the sort keys in domain order, then by every other
//! column, so two tables holding the same rows in any order sort to the
//! same table.

use std::cmp::Ordering;

use polars::prelude::{DataFrame, DataType, IdxCa, IdxSize};
use sphincter_common::{bool_column, column_names, float_column, text_column};
use sphincter_model::{CategoryDomain, ColumnType, PrepError, Result, Schema};

enum SortColumn<'a> {
    Category(&'a CategoryDomain, Vec<Option<String>>),
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
}

impl SortColumn<'_> {
    fn compare(&self, left: usize, right: usize) -> Ordering {
        match self {
            Self::Category(domain, values) => nulls_first(&values[left], &values[right], |l, r| {
                domain.compare(l, r)
            }),
            Self::Text(values) => nulls_first(&values[left], &values[right], |l, r| l.cmp(r)),
            Self::Number(values) => {
                nulls_first(&values[left], &values[right], |l, r| l.total_cmp(r))
            }
            Self::Boolean(values) => nulls_first(&values[left], &values[right], |l, r| l.cmp(r)),
        }
    }
}

fn nulls_first<T>(left: &Option<T>, right: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(l), Some(r)) => cmp(l, r),
    }
}

fn sort_column<'a>(df: &DataFrame, schema: &'a Schema, name: &str) -> Result<SortColumn<'a>> {
    let not_found = |_| PrepError::column_not_found(name);
    let column = match schema.column(name).map(|spec| &spec.column_type) {
        Some(ColumnType::Category(domain)) => {
            SortColumn::Category(domain, text_column(df, name).map_err(not_found)?)
        }
        Some(ColumnType::Text) => SortColumn::Text(text_column(df, name).map_err(not_found)?),
        Some(ColumnType::Float | ColumnType::Integer) => {
            SortColumn::Number(float_column(df, name).map_err(not_found)?)
        }
        Some(ColumnType::Boolean) => SortColumn::Boolean(bool_column(df, name).map_err(not_found)?),
        None => {
            match df.column(name).map_err(not_found)?.dtype() {
                DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64 => SortColumn::Number(float_column(df, name).map_err(not_found)?),
                DataType::Boolean => SortColumn::Boolean(bool_column(df, name).map_err(not_found)?),
                _ => SortColumn::Text(text_column(df, name).map_err(not_found)?),
            }
        }
    };
    Ok(column)
}

/// Sorts rows by `keys` in domain order, breaking ties with the remaining
/// columns in frame order.
pub fn sort_rows(df: &DataFrame, schema: &Schema, keys: &[String]) -> Result<DataFrame> {
    let mut order: Vec<&str> = keys.iter().map(String::as_str).collect();
    let names = column_names(df);
    for name in &names {
        if !order.contains(&name.as_str()) {
            order.push(name);
        }
    }
    let columns = order
        .iter()
        .map(|name| sort_column(df, schema, name))
        .collect::<Result<Vec<_>>>()?;

    let mut rows: Vec<usize> = (0..df.height()).collect();
    rows.sort_by(|&left, &right| {
        columns
            .iter()
            .map(|column| column.compare(left, right))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    let indices = rows
        .into_iter()
        .map(|row| {
            IdxSize::try_from(row).map_err(|_| PrepError::DataFrame {
                message: format!("row index {row} exceeds the index range"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(df.take(&IdxCa::from_vec("rows".into(), indices))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;
    use sphincter_model::{ColumnSpec, OrderedCategory};

    #[test]
    fn keys_sort_in_declared_order_then_ties_break() {
        let schema = Schema::new(
            "demo",
            vec![
                ColumnSpec::ordered("age", OrderedCategory::new("age", ["adult", "old"])),
                ColumnSpec::float("value"),
            ],
        );
        let df = DataFrame::new(vec![
            Column::new("age".into(), &["old", "adult", "old", "adult"]),
            Column::new("value".into(), &[1.0, 3.0, 0.5, 2.0]),
        ])
        .unwrap();
        let out = sort_rows(&df, &schema, &["age".to_string()]).unwrap();
        let ages = text_column(&out, "age").unwrap();
        let values = float_column(&out, "value").unwrap();
        assert_eq!(
            ages.iter().flatten().map(String::as_str).collect::<Vec<_>>(),
            ["adult", "adult", "old", "old"]
        );
        assert_eq!(values, vec![Some(2.0), Some(3.0), Some(0.5), Some(1.0)]);
    }

    #[test]
    fn unknown_key_is_reported() {
        let schema = Schema::new("demo", Vec::new());
        let df = DataFrame::new(vec![Column::new("a".into(), &[1.0])]).unwrap();
        let err = sort_rows(&df, &schema, &["missing".to_string()]).unwrap_err();
        assert!(matches!(err, PrepError::ColumnNotFound { .. }));
    }
}
