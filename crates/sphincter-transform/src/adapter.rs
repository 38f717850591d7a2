//! Maps a validated, sorted table to the model-input record.

use polars::prelude::DataFrame;
use sphincter_common::{float_column, text_column};
use sphincter_model::{
    CategoryDomain, ModelInput, ModelInputLayout, Outcome, OutcomeSpec, PrepError, Result, Schema,
};

use crate::encode::{Encoding, one_encode};

/// Builds the model input for `df` according to `layout`.
///
/// Age is a property of the subject: every row gets the code of the first
/// age observed for its subject.
pub fn build_model_input(
    df: &DataFrame,
    schema: &Schema,
    layout: &ModelInputLayout,
) -> Result<ModelInput> {
    let n = df.height();
    let mouse = encode_column(df, schema, &layout.subject)?;
    let age = encode_column(df, schema, &layout.age)?;

    let mut mouse_age: Vec<Option<usize>> = vec![None; mouse.cardinality()];
    for (mouse_code, age_code) in mouse.codes.iter().zip(&age.codes) {
        let slot = &mut mouse_age[mouse_code - 1];
        if slot.is_none() {
            *slot = Some(*age_code);
        }
    }
    let mouse_age: Vec<usize> = mouse_age.into_iter().map(|code| code.unwrap_or(0)).collect();
    let row_age = mouse.codes.iter().map(|code| mouse_age[code - 1]).collect();

    let treatment = layout
        .treatment
        .as_deref()
        .map(|column| encode_column(df, schema, column))
        .transpose()?;
    let vessel_type = layout
        .vessel_type
        .as_deref()
        .map(|column| encode_column(df, schema, column))
        .transpose()?;

    let y = match &layout.outcome {
        None => None,
        Some(OutcomeSpec::Single(column)) => Some(Outcome::Single(required_floats(df, column)?)),
        Some(OutcomeSpec::Stacked(columns)) => Some(Outcome::Stacked(
            columns
                .iter()
                .map(|column| required_floats(df, column))
                .collect::<Result<_>>()?,
        )),
    };

    let hyper = layout
        .hyper
        .as_ref()
        .map(|indicator| -> Result<Vec<u8>> {
            let values = text_column(df, &indicator.column)
                .map_err(|_| PrepError::column_not_found(&indicator.column))?;
            Ok(values
                .iter()
                .map(|value| {
                    u8::from(
                        value
                            .as_ref()
                            .is_some_and(|label| indicator.labels.contains(label)),
                    )
                })
                .collect())
        })
        .transpose()?;

    let pressure = layout
        .pressure
        .as_deref()
        .map(|column| required_floats(df, column))
        .transpose()?;
    let diameter = layout
        .diameter
        .as_deref()
        .map(|column| required_floats(df, column))
        .transpose()?;

    let (k, x) = if layout.covariates.is_empty() {
        (None, None)
    } else {
        let columns = layout
            .covariates
            .iter()
            .map(|column| required_floats(df, column))
            .collect::<Result<Vec<_>>>()?;
        let rows = (0..n)
            .map(|row| columns.iter().map(|column| column[row]).collect())
            .collect();
        (Some(layout.covariates.len()), Some(rows))
    };

    let ix: Vec<usize> = (1..=n).collect();
    Ok(ModelInput {
        n,
        n_age: age.cardinality(),
        n_mouse: mouse.cardinality(),
        n_treatment: treatment.as_ref().map(Encoding::cardinality),
        n_vessel_type: vessel_type.as_ref().map(Encoding::cardinality),
        n_train: n,
        n_test: n,
        age: row_age,
        mouse_age,
        mouse: mouse.codes,
        treatment: treatment.map(|encoding| encoding.codes),
        vessel_type: vessel_type.map(|encoding| encoding.codes),
        ix_train: ix.clone(),
        ix_test: ix,
        y,
        hyper,
        pressure,
        diameter,
        k,
        x,
    })
}

fn encode_column(df: &DataFrame, schema: &Schema, column: &str) -> Result<Encoding> {
    let labels = text_column(df, column).map_err(|_| PrepError::column_not_found(column))?;
    let lexical = CategoryDomain::Lexical;
    let domain = schema.domain(column).unwrap_or(&lexical);
    one_encode(&labels, domain)
}

fn required_floats(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let values = float_column(df, column).map_err(|_| PrepError::column_not_found(column))?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| PrepError::InvalidColumn {
                column: column.to_string(),
                message: format!("missing value at row {row}"),
            })
        })
        .collect()
}
