//! Row-wise column extraction over Polars DataFrames.
//!
//! The preparation crates work on small tables (hundreds of rows), so values
//! are pulled out row by row through `AnyValue` rather than through typed
//! chunked-array casts. That keeps coercion rules in one place.

use polars::prelude::{AnyValue, DataFrame, PolarsResult};

use crate::values::{any_to_bool, any_to_f64, any_to_string, is_missing};

/// Column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

/// Reads a column as optional floats. NaN and unparseable values become `None`.
pub fn float_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        values.push(any_to_f64(value).filter(|v| !v.is_nan()));
    }
    Ok(values)
}

/// Reads a column as optional text. Missing values become `None`.
pub fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        if is_missing(&value) {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value).trim().to_string()));
        }
    }
    Ok(values)
}

/// Reads a column as optional booleans.
pub fn bool_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<bool>>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        values.push(any_to_bool(value));
    }
    Ok(values)
}

/// Cell-by-cell equality: same column names, dtypes, order and values.
pub fn frames_equal(left: &DataFrame, right: &DataFrame) -> bool {
    if left.shape() != right.shape() {
        return false;
    }
    for (l, r) in left.get_columns().iter().zip(right.get_columns()) {
        if l.name() != r.name() || l.dtype() != r.dtype() {
            return false;
        }
        for idx in 0..left.height() {
            let lv = l.get(idx).unwrap_or(AnyValue::Null);
            let rv = r.get(idx).unwrap_or(AnyValue::Null);
            if lv != rv {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn float_column_treats_nan_and_text_as_missing() {
        let df = frame(vec![
            Series::new("x".into(), vec![Some(1.5), Some(f64::NAN), None]).into_column(),
        ]);
        assert_eq!(float_column(&df, "x").unwrap(), vec![Some(1.5), None, None]);
    }

    #[test]
    fn text_column_stringifies_numbers() {
        let df = frame(vec![
            Series::new("mouse".into(), vec![Some(310321i64), None]).into_column(),
        ]);
        assert_eq!(
            text_column(&df, "mouse").unwrap(),
            vec![Some("310321".to_string()), None]
        );
    }

    #[test]
    fn frames_equal_detects_value_and_dtype_changes() {
        let a = frame(vec![Series::new("x".into(), vec![1.0, 2.0]).into_column()]);
        let b = frame(vec![Series::new("x".into(), vec![1.0, 2.0]).into_column()]);
        let c = frame(vec![Series::new("x".into(), vec![1.0, 2.5]).into_column()]);
        let d = frame(vec![Series::new("x".into(), vec![1i64, 2]).into_column()]);
        assert!(frames_equal(&a, &b));
        assert!(!frames_equal(&a, &c));
        assert!(!frames_equal(&a, &d));
        assert_eq!(column_names(&a), vec!["x".to_string()]);
    }
}
