//! Computed columns.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use sphincter_common::{float_column, text_column};
use sphincter_model::{Derivation, PrepError, Result, Threshold};

/// Applies derivations in order. Each one may read the columns written by
/// the ones before it.
pub fn apply_derivations(df: &DataFrame, derivations: &[Derivation]) -> Result<DataFrame> {
    let mut out = df.clone();
    for derivation in derivations {
        let column = derive_column(&out, derivation)?;
        out.with_column(column)?;
    }
    Ok(out)
}

fn derive_column(df: &DataFrame, derivation: &Derivation) -> Result<Column> {
    let target = derivation.target();
    let column = match derivation {
        Derivation::Difference { left, right, .. } => {
            floats(target, binary(df, left, right, |a, b| a - b)?)
        }
        Derivation::LogRatio {
            numerator,
            denominator,
            ..
        } => floats(target, binary(df, numerator, denominator, |a, b| (a / b).ln())?),
        Derivation::RelativeChange { after, before, .. } => {
            floats(target, binary(df, after, before, |a, b| (a - b) / b)?)
        }
        Derivation::Ratio {
            numerator,
            denominator,
            ..
        } => floats(target, binary(df, numerator, denominator, |a, b| a / b)?),
        Derivation::RowSum { columns, .. } => {
            let mut sums = vec![0.0; df.height()];
            for name in columns {
                for (sum, value) in sums.iter_mut().zip(read_floats(df, name)?) {
                    *sum += value.unwrap_or(0.0);
                }
            }
            floats(target, sums.into_iter().map(finite).collect())
        }
        Derivation::FilledRatio {
            numerator,
            denominator,
            ..
        } => {
            let num = read_floats(df, numerator)?;
            let den = read_floats(df, denominator)?;
            let values = num
                .iter()
                .zip(&den)
                .map(|(n, d)| d.and_then(|d| finite(n.unwrap_or(0.0) / d)))
                .collect();
            floats(target, values)
        }
        Derivation::CenterByGroup { column, group, .. } => {
            floats(target, center_by_group(df, column, group)?)
        }
        Derivation::Log { column, .. } => floats(target, unary(df, column, f64::ln)?),
        Derivation::Log1p { column, .. } => floats(target, unary(df, column, f64::ln_1p)?),
        Derivation::Logit { column, .. } => {
            floats(target, unary(df, column, |p| (p / (1.0 - p)).ln())?)
        }
        Derivation::Clip { column, max, .. } => {
            let max = *max;
            floats(target, unary(df, column, |v| v.min(max))?)
        }
        Derivation::RatioThreshold {
            numerator,
            denominator,
            threshold,
            direction,
            ..
        } => {
            let num = read_floats(df, numerator)?;
            let den = read_floats(df, denominator)?;
            let flags: Vec<bool> = num
                .iter()
                .zip(&den)
                .map(|pair| match pair {
                    (Some(n), Some(d)) => {
                        let ratio = n / d;
                        match direction {
                            Threshold::Below => ratio < *threshold,
                            Threshold::Above => ratio > *threshold,
                        }
                    }
                    _ => false,
                })
                .collect();
            Series::new(target.into(), flags).into_column()
        }
        Derivation::Lowercase { column, .. } => {
            let values: Vec<Option<String>> = read_text(df, column)?
                .into_iter()
                .map(|value| value.map(|v| v.to_lowercase()))
                .collect();
            Series::new(target.into(), values).into_column()
        }
        Derivation::ToText { column, .. } => {
            Series::new(target.into(), read_text(df, column)?).into_column()
        }
        Derivation::Concat { columns, .. } => {
            let parts = columns
                .iter()
                .map(|name| read_text(df, name))
                .collect::<Result<Vec<_>>>()?;
            let values: Vec<Option<String>> = (0..df.height())
                .map(|row| {
                    parts
                        .iter()
                        .map(|part| part[row].as_deref())
                        .collect::<Option<Vec<&str>>>()
                        .map(|pieces| pieces.concat())
                })
                .collect();
            Series::new(target.into(), values).into_column()
        }
        Derivation::Copy { column, .. } => df
            .column(column)
            .map_err(|_| PrepError::column_not_found(column))?
            .clone()
            .with_name(target.into()),
    };
    Ok(column)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn floats(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

fn read_floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    float_column(df, name).map_err(|_| PrepError::column_not_found(name))
}

fn read_text(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    text_column(df, name).map_err(|_| PrepError::column_not_found(name))
}

fn unary(df: &DataFrame, column: &str, f: impl Fn(f64) -> f64) -> Result<Vec<Option<f64>>> {
    Ok(read_floats(df, column)?
        .into_iter()
        .map(|value| value.and_then(|v| finite(f(v))))
        .collect())
}

fn binary(
    df: &DataFrame,
    left: &str,
    right: &str,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Vec<Option<f64>>> {
    let left = read_floats(df, left)?;
    let right = read_floats(df, right)?;
    Ok(left
        .iter()
        .zip(&right)
        .map(|pair| match pair {
            (Some(a), Some(b)) => finite(f(*a, *b)),
            _ => None,
        })
        .collect())
}

/// Rows with a missing group key or value stay missing.
///
/// Group members are summed in ascending order so the mean does not depend
/// on row order.
fn center_by_group(df: &DataFrame, column: &str, group: &str) -> Result<Vec<Option<f64>>> {
    let values = read_floats(df, column)?;
    let groups = read_text(df, group)?;
    let mut members: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (value, key) in values.iter().zip(&groups) {
        if let (Some(value), Some(key)) = (value, key) {
            members.entry(key.as_str()).or_default().push(*value);
        }
    }
    let means: BTreeMap<&str, f64> = members
        .into_iter()
        .map(|(key, mut group_values)| {
            group_values.sort_by(f64::total_cmp);
            let sum: f64 = group_values.iter().sum();
            (key, sum / group_values.len() as f64)
        })
        .collect();
    Ok(values
        .iter()
        .zip(&groups)
        .map(|(value, key)| {
            let mean = means.get(key.as_deref()?)?;
            finite((*value)? - mean)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("before".into(), &[Some(10.0), Some(4.0), None]),
            Column::new("after".into(), &[Some(15.0), Some(2.0), Some(1.0)]),
            Column::new("group".into(), &["a", "a", "b"]),
        ])
        .unwrap()
    }

    fn floats_of(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        float_column(df, name).unwrap()
    }

    #[test]
    fn change_columns_from_before_and_after() {
        let out = apply_derivations(
            &frame(),
            &[
                Derivation::difference("change", "after", "before"),
                Derivation::log_ratio("log_ratio", "after", "before"),
                Derivation::relative_change("rel", "after", "before"),
            ],
        )
        .unwrap();
        assert_eq!(floats_of(&out, "change"), vec![Some(5.0), Some(-2.0), None]);
        let log_ratio = floats_of(&out, "log_ratio")[0].unwrap();
        assert!((log_ratio - 1.5f64.ln()).abs() < 1e-12);
        assert!((log_ratio - 0.405_465).abs() < 1e-6);
        assert_eq!(floats_of(&out, "rel"), vec![Some(0.5), Some(-0.5), None]);
    }

    #[test]
    fn row_sum_skips_missing_values() {
        let out =
            apply_derivations(&frame(), &[Derivation::row_sum("sum", &["before", "after"])]).unwrap();
        assert_eq!(floats_of(&out, "sum"), vec![Some(25.0), Some(6.0), Some(1.0)]);
    }

    #[test]
    fn filled_ratio_reads_missing_numerator_as_zero() {
        let out = apply_derivations(
            &frame(),
            &[Derivation::filled_ratio("ratio", "before", "after")],
        )
        .unwrap();
        assert_eq!(floats_of(&out, "ratio")[2], Some(0.0));
    }

    #[test]
    fn centering_subtracts_group_mean() {
        let out = apply_derivations(
            &frame(),
            &[Derivation::center_by_group("centered", "after", "group")],
        )
        .unwrap();
        assert_eq!(
            floats_of(&out, "centered"),
            vec![Some(6.5), Some(-6.5), Some(0.0)]
        );
    }

    #[test]
    fn non_finite_results_become_missing() {
        let df = DataFrame::new(vec![Column::new("p".into(), &[0.0, 0.5, 1.0])]).unwrap();
        let out = apply_derivations(
            &df,
            &[
                Derivation::logit("logit", "p"),
                Derivation::log("ln", "p"),
                Derivation::log1p("ln1p", "p"),
            ],
        )
        .unwrap();
        assert_eq!(floats_of(&out, "logit"), vec![None, Some(0.0), None]);
        assert_eq!(floats_of(&out, "ln")[0], None);
        assert_eq!(floats_of(&out, "ln1p")[0], Some(0.0));
    }

    #[test]
    fn clip_caps_in_place() {
        let df = DataFrame::new(vec![Column::new("p".into(), &[0.5, 0.99])]).unwrap();
        let out = apply_derivations(&df, &[Derivation::clip("p", 0.98)]).unwrap();
        assert_eq!(floats_of(&out, "p"), vec![Some(0.5), Some(0.98)]);
        assert_eq!(out.width(), 1);
    }

    #[test]
    fn ratio_threshold_flags() {
        let out = apply_derivations(
            &frame(),
            &[Derivation::ratio_threshold(
                "narrow",
                "after",
                "before",
                0.8,
                Threshold::Below,
            )],
        )
        .unwrap();
        let flags = out.column("narrow").unwrap().bool().unwrap();
        let flags: Vec<Option<bool>> = flags.into_iter().collect();
        assert_eq!(flags, vec![Some(false), Some(true), Some(false)]);
    }

    #[test]
    fn text_derivations() {
        let df = DataFrame::new(vec![
            Column::new("Date".into(), &[20230201i64]),
            Column::new("n".into(), &[3.0]),
            Column::new("Age".into(), &["Adult"]),
        ])
        .unwrap();
        let out = apply_derivations(
            &df,
            &[
                Derivation::concat("id", &["Date", "n"]),
                Derivation::to_text("mouse_id", "Date"),
                Derivation::lowercase("age", "Age"),
                Derivation::copy("date_copy", "Date"),
            ],
        )
        .unwrap();
        let text = |name: &str| text_column(&out, name).unwrap()[0].clone();
        assert_eq!(text("id").as_deref(), Some("202302013"));
        assert_eq!(text("mouse_id").as_deref(), Some("20230201"));
        assert_eq!(text("age").as_deref(), Some("adult"));
        assert_eq!(text("date_copy").as_deref(), Some("20230201"));
    }
}
