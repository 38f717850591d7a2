//! Per-group aggregation.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use sphincter_common::{any_to_f64, is_missing, text_column};
use sphincter_model::{AggregateColumn, Aggregation, PrepError, Result};

use crate::derive::apply_derivations;

/// Collapses `df` to one row per distinct `group_by` value, in ascending key
/// order, then applies the aggregation's derivations.
///
/// Rows with a missing group key are dropped. `First` takes the first
/// non-missing value of the group.
pub fn aggregate(df: &DataFrame, aggregation: &Aggregation) -> Result<DataFrame> {
    let keys = text_column(df, &aggregation.group_by)
        .map_err(|_| PrepError::column_not_found(&aggregation.group_by))?;
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, key) in keys.into_iter().enumerate() {
        if let Some(key) = key {
            groups.entry(key).or_default().push(row);
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(aggregation.columns.len() + 1);
    let group_values: Vec<&str> = groups.keys().map(String::as_str).collect();
    columns.push(Series::new(aggregation.group_by.as_str().into(), group_values).into_column());

    for spec in &aggregation.columns {
        let column = match spec {
            AggregateColumn::First { target, column } => {
                let values = first_values(df, column, &groups)?;
                Series::from_any_values(target.as_str().into(), &values, false)?.into_column()
            }
            AggregateColumn::FirstScaled {
                target,
                column,
                factor,
            } => {
                let values: Vec<Option<f64>> = first_values(df, column, &groups)?
                    .into_iter()
                    .map(|value| any_to_f64(value).map(|v| v * factor))
                    .collect();
                Series::new(target.as_str().into(), values).into_column()
            }
            AggregateColumn::Count { target } => {
                let counts: Vec<i64> = groups
                    .values()
                    .map(|rows| i64::try_from(rows.len()).unwrap_or(i64::MAX))
                    .collect();
                Series::new(target.as_str().into(), counts).into_column()
            }
        };
        columns.push(column);
    }

    let aggregated = DataFrame::new(columns)?;
    apply_derivations(&aggregated, &aggregation.derivations)
}

fn first_values(
    df: &DataFrame,
    column: &str,
    groups: &BTreeMap<String, Vec<usize>>,
) -> Result<Vec<AnyValue<'static>>> {
    let series = df
        .column(column)
        .map_err(|_| PrepError::column_not_found(column))?;
    Ok(groups
        .values()
        .map(|rows| {
            rows.iter()
                .map(|&row| series.get(row).unwrap_or(AnyValue::Null))
                .find(|value| !is_missing(value))
                .map_or(AnyValue::Null, AnyValue::into_static)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sphincter_common::float_column;
    use sphincter_model::{Derivation, Schema};

    #[test]
    fn counts_and_firsts_per_group() {
        let df = DataFrame::new(vec![
            Column::new("mouse_id".into(), &["b", "a", "b", "b"]),
            Column::new("age".into(), &[None, Some("old"), Some("adult"), Some("old")]),
            Column::new("area".into(), &[4.0, 8.0, 4.0, 4.0]),
        ])
        .unwrap();
        let aggregation = Aggregation {
            group_by: "mouse_id".to_string(),
            columns: vec![
                AggregateColumn::First {
                    target: "age".to_string(),
                    column: "age".to_string(),
                },
                AggregateColumn::FirstScaled {
                    target: "craniotomy_area".to_string(),
                    column: "area".to_string(),
                    factor: 0.5,
                },
                AggregateColumn::Count {
                    target: "collaterals".to_string(),
                },
            ],
            derivations: vec![Derivation::ratio(
                "per_area",
                "collaterals",
                "craniotomy_area",
            )],
            schema: Arc::new(Schema::new("groups", Vec::new())),
        };
        let out = aggregate(&df, &aggregation).unwrap();
        assert_eq!(out.height(), 2);
        let ids = text_column(&out, "mouse_id").unwrap();
        assert_eq!(ids, vec![Some("a".to_string()), Some("b".to_string())]);
        let ages = text_column(&out, "age").unwrap();
        assert_eq!(ages, vec![Some("old".to_string()), Some("adult".to_string())]);
        assert_eq!(
            float_column(&out, "craniotomy_area").unwrap(),
            vec![Some(4.0), Some(2.0)]
        );
        assert_eq!(
            float_column(&out, "per_area").unwrap(),
            vec![Some(0.25), Some(1.5)]
        );
    }
}
