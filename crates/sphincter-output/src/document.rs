//! The persisted document and its conversion to and from a dataset.
//!
//! Shape: `{name, coordinates, measurements, model_input}` where
//! `measurements` is column-oriented, `[{"name": .., "values": [..]}, ..]`,
//! in table column order.

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use sphincter_common::{any_to_string, frames_equal};
use sphincter_model::{CoordinateIndex, ModelInput, PrepError, Result, ValidatedDataset};
use sphincter_standards::StudyRegistry;
use sphincter_transform::{index_and_encode, sort_rows};
use sphincter_validate::{project, validate_and_coerce};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasurementColumn {
    pub name: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetDocument {
    pub name: String,
    pub coordinates: CoordinateIndex,
    pub measurements: Vec<MeasurementColumn>,
    pub model_input: ModelInput,
}

impl DatasetDocument {
    /// Converts a dataset into its document form.
    pub fn from_dataset(dataset: &ValidatedDataset) -> Result<Self> {
        let df = dataset.measurements();
        let measurements = df
            .get_columns()
            .iter()
            .map(|column| {
                let name = column.name().as_str();
                let values = (0..df.height())
                    .map(|row| to_json(name, column.get(row).unwrap_or(AnyValue::Null)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(MeasurementColumn {
                    name: name.to_string(),
                    values,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: dataset.name().to_string(),
            coordinates: dataset.coordinates().clone(),
            measurements,
            model_input: dataset.model_input().clone(),
        })
    }

    /// Rebuilds a dataset, re-running full validation.
    ///
    /// The schema is chosen by the longest registered prefix of `name`. When
    /// `name` is a registered variant, the row order, coordinates and model
    /// input must also match what the builder derives from the measurements.
    pub fn into_dataset(self, registry: &StudyRegistry) -> Result<ValidatedDataset> {
        let family = registry.family_for(&self.name)?;
        let table = self.measurement_frame()?;
        let validated = validate_and_coerce(&table, &family.schema)?;
        let measurements = project(&validated, &family.schema)?;

        if measurements.height() != self.model_input.n {
            return Err(PrepError::malformed(format!(
                "model input declares N = {} but measurements hold {} rows",
                self.model_input.n,
                measurements.height()
            )));
        }

        if let Some(spec) = registry.variant(&self.name) {
            let sorted = sort_rows(&measurements, &family.schema, &spec.sort_keys)?;
            if !frames_equal(&sorted, &measurements) {
                return Err(PrepError::malformed("measurements are not in canonical row order"));
            }
            let (coordinates, model_input) = index_and_encode(&measurements, &family.schema, spec)?;
            if coordinates != self.coordinates {
                return Err(PrepError::malformed(
                    "coordinates do not match the measurements",
                ));
            }
            if model_input != self.model_input {
                return Err(PrepError::malformed(
                    "model input does not match the measurements",
                ));
            }
        }

        Ok(ValidatedDataset::new(
            self.name,
            self.coordinates,
            measurements,
            self.model_input,
        ))
    }

    fn measurement_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.measurements.len());
        let mut height = None;
        for column in &self.measurements {
            match height {
                None => height = Some(column.values.len()),
                Some(h) if h != column.values.len() => {
                    return Err(PrepError::malformed(format!(
                        "column '{}' has {} values, expected {h}",
                        column.name,
                        column.values.len()
                    )));
                }
                Some(_) => {}
            }
            columns.push(from_json(&column.name, &column.values)?);
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn to_json(column: &str, value: AnyValue<'_>) -> Result<Value> {
    let json = match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(v),
        AnyValue::Int16(v) => Value::from(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt8(v) => Value::from(v),
        AnyValue::UInt16(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float_json(column, f64::from(v))?,
        AnyValue::Float64(v) => float_json(column, v)?,
        other => Value::String(any_to_string(other)),
    };
    Ok(json)
}

fn float_json(column: &str, value: f64) -> Result<Value> {
    if value.is_nan() {
        return Ok(Value::Null);
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| PrepError::InvalidColumn {
            column: column.to_string(),
            message: format!("{value} cannot be written to JSON"),
        })
}

/// Builds a column with the narrowest type holding every value. Mixed
/// columns fall back to text and are left to validation.
fn from_json(name: &str, values: &[Value]) -> Result<Column> {
    let present = || values.iter().filter(|value| !value.is_null());
    let series = if present().all(Value::is_boolean) && present().next().is_some() {
        let values: Vec<Option<bool>> = values.iter().map(Value::as_bool).collect();
        Series::new(name.into(), values)
    } else if present().all(Value::is_i64) && present().next().is_some() {
        let values: Vec<Option<i64>> = values.iter().map(Value::as_i64).collect();
        Series::new(name.into(), values)
    } else if present().all(Value::is_number) && present().next().is_some() {
        let values: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = values
            .iter()
            .map(|value| match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Series::new(name.into(), values)
    };
    Ok(series.into_column())
}
