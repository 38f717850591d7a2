//! Cell-level coercion to a declared column type.

use polars::prelude::{AnyValue, Column, IntoColumn, NamedFrom, Series};
use sphincter_common::{any_to_bool, any_to_f64, any_to_i64, any_to_string, is_missing};
use sphincter_model::{ColumnSpec, ColumnType, ViolationReason};

/// A coerced cell value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Missing,
    Float(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl Cell {
    /// Text form used to compare cells for uniqueness.
    pub(crate) fn key(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Float(v) => Some(v.to_string()),
            Self::Integer(v) => Some(v.to_string()),
            Self::Boolean(v) => Some(v.to_string()),
            Self::Text(v) => Some(v.clone()),
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// Coerces one raw value, returning the type-level failure if any.
///
/// Nullability and constraints are checked separately on the result.
pub(crate) fn coerce_cell(value: AnyValue<'_>, column_type: &ColumnType) -> Result<Cell, ViolationReason> {
    if is_missing(&value) {
        return Ok(Cell::Missing);
    }
    let uncoercible = |value: &AnyValue<'_>| ViolationReason::Uncoercible {
        value: any_to_string(value.clone()),
        expected: column_type.label().to_string(),
    };
    match column_type {
        ColumnType::Float => {
            let v = any_to_f64(value.clone()).ok_or_else(|| uncoercible(&value))?;
            if v.is_nan() {
                Ok(Cell::Missing)
            } else if v.is_finite() {
                Ok(Cell::Float(v))
            } else {
                Err(ViolationReason::NonFinite {
                    value: v.to_string(),
                })
            }
        }
        ColumnType::Integer => any_to_i64(value.clone())
            .map(Cell::Integer)
            .ok_or_else(|| uncoercible(&value)),
        ColumnType::Boolean => any_to_bool(value.clone())
            .map(Cell::Boolean)
            .ok_or_else(|| uncoercible(&value)),
        ColumnType::Text => Ok(Cell::Text(any_to_string(value).trim().to_string())),
        ColumnType::Category(domain) => {
            let label = any_to_string(value).trim().to_string();
            if domain.admits(&label) {
                Ok(Cell::Text(label))
            } else {
                Err(ViolationReason::OutOfDomain { value: label })
            }
        }
    }
}

/// Checks nullability and constraints of an already coerced cell.
pub(crate) fn check_cell(cell: &Cell, spec: &ColumnSpec) -> Vec<ViolationReason> {
    if matches!(cell, Cell::Missing) {
        return if spec.nullable {
            Vec::new()
        } else {
            vec![ViolationReason::UnexpectedNull]
        };
    }
    let Some(value) = cell.numeric() else {
        return Vec::new();
    };
    spec.constraints
        .iter()
        .filter(|constraint| !constraint.holds(value))
        .map(|constraint| ViolationReason::ConstraintFailed {
            constraint: *constraint,
            value,
        })
        .collect()
}

/// Builds a typed column from coerced cells. Failed cells are stored as null.
pub(crate) fn build_column(name: &str, column_type: &ColumnType, cells: Vec<Cell>) -> Column {
    let series = match column_type {
        ColumnType::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(Cell::numeric).collect();
            Series::new(name.into(), values)
        }
        ColumnType::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Integer(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnType::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Boolean(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnType::Text | ColumnType::Category(_) => {
            let values: Vec<Option<String>> = cells
                .into_iter()
                .map(|cell| match cell {
                    Cell::Text(v) => Some(v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
    };
    series.into_column()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphincter_model::{CategoryDomain, OrderedCategory};

    #[test]
    fn numeric_strings_become_floats() {
        assert_eq!(
            coerce_cell(AnyValue::String(" 2.5 "), &ColumnType::Float),
            Ok(Cell::Float(2.5))
        );
    }

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(
            coerce_cell(AnyValue::Float64(4.0), &ColumnType::Integer),
            Ok(Cell::Integer(4))
        );
        assert!(coerce_cell(AnyValue::Float64(4.5), &ColumnType::Integer).is_err());
    }

    #[test]
    fn numbers_become_text() {
        assert_eq!(
            coerce_cell(AnyValue::Int64(310321), &ColumnType::Text),
            Ok(Cell::Text("310321".to_string()))
        );
    }

    #[test]
    fn booleans_accept_zero_and_one() {
        assert_eq!(
            coerce_cell(AnyValue::Int64(1), &ColumnType::Boolean),
            Ok(Cell::Boolean(true))
        );
        assert_eq!(
            coerce_cell(AnyValue::String("false"), &ColumnType::Boolean),
            Ok(Cell::Boolean(false))
        );
        assert!(coerce_cell(AnyValue::Int64(2), &ColumnType::Boolean).is_err());
    }

    #[test]
    fn nan_is_missing_and_infinity_is_rejected() {
        assert_eq!(
            coerce_cell(AnyValue::Float64(f64::NAN), &ColumnType::Float),
            Ok(Cell::Missing)
        );
        assert!(matches!(
            coerce_cell(AnyValue::Float64(f64::INFINITY), &ColumnType::Float),
            Err(ViolationReason::NonFinite { .. })
        ));
    }

    #[test]
    fn nan_text_is_missing() {
        assert_eq!(
            coerce_cell(AnyValue::String("NaN"), &ColumnType::Float),
            Ok(Cell::Missing)
        );
        assert_eq!(
            coerce_cell(AnyValue::String("nan"), &ColumnType::Float),
            Ok(Cell::Missing)
        );
    }

    #[test]
    fn category_checks_domain() {
        let domain = CategoryDomain::Declared(OrderedCategory::new("age", ["adult", "old"]));
        let column_type = ColumnType::Category(domain);
        assert_eq!(
            coerce_cell(AnyValue::String("old"), &column_type),
            Ok(Cell::Text("old".to_string()))
        );
        assert_eq!(
            coerce_cell(AnyValue::String("young"), &column_type),
            Err(ViolationReason::OutOfDomain {
                value: "young".to_string()
            })
        );
    }
}
