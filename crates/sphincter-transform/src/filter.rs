//! Row filters.

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};
use sphincter_common::{any_to_string, float_column, is_missing};
use sphincter_model::{PrepError, Result, RowFilter};
use tracing::debug;

/// Applies every filter in order, keeping rows that pass all of them.
pub fn apply_filters(df: &DataFrame, filters: &[RowFilter]) -> Result<DataFrame> {
    let mut current = df.clone();
    for filter in filters {
        let keep = filter_mask(&current, filter)?;
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let before = current.height();
        current = current.filter(&mask)?;
        debug!(
            filter = ?filter,
            input_rows = before,
            output_rows = current.height(),
            "row filter applied"
        );
    }
    Ok(current)
}

fn filter_mask(df: &DataFrame, filter: &RowFilter) -> Result<Vec<bool>> {
    match filter {
        RowFilter::NotNull { columns } => {
            let mut keep = vec![true; df.height()];
            for name in columns {
                let column = df
                    .column(name)
                    .map_err(|_| PrepError::column_not_found(name))?;
                for (idx, flag) in keep.iter_mut().enumerate() {
                    let value = column.get(idx).unwrap_or(AnyValue::Null);
                    if is_missing(&value) {
                        *flag = false;
                    }
                }
            }
            Ok(keep)
        }
        RowFilter::NotIn { column, values } => {
            let series = df
                .column(column)
                .map_err(|_| PrepError::column_not_found(column))?;
            Ok((0..df.height())
                .map(|idx| {
                    let value = series.get(idx).unwrap_or(AnyValue::Null);
                    let text = any_to_string(value);
                    !values.iter().any(|excluded| excluded == text.trim())
                })
                .collect())
        }
        RowFilter::AtMost {
            column,
            bound_column,
        } => {
            let values = float_column(df, column).map_err(|_| PrepError::column_not_found(column))?;
            let bounds = float_column(df, bound_column)
                .map_err(|_| PrepError::column_not_found(bound_column))?;
            Ok(values
                .iter()
                .zip(&bounds)
                .map(|pair| matches!(pair, (Some(v), Some(b)) if v <= b))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("mouse".into(), &[310321i64, 40921, 40922]),
            Column::new("a".into(), &[Some(1.0), None, Some(f64::NAN)]),
            Column::new("b".into(), &[Some(2.0), Some(0.5), Some(0.5)]),
        ])
        .unwrap()
    }

    #[test]
    fn not_null_drops_nulls_and_nan() {
        let out = apply_filters(&frame(), &[RowFilter::not_null(["a"])]).unwrap();
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn not_in_compares_text_forms() {
        let out = apply_filters(&frame(), &[RowFilter::not_in("mouse", ["310321"])]).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn at_most_requires_both_sides() {
        let out = apply_filters(&frame(), &[RowFilter::at_most("a", "b")]).unwrap();
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn unknown_column_is_reported() {
        let err = apply_filters(&frame(), &[RowFilter::not_null(["zzz"])]).unwrap_err();
        assert!(matches!(err, PrepError::ColumnNotFound { column } if column == "zzz"));
    }
}
