//! The parametric dataset builder.
//!
//! One routine turns a raw table into a validated dataset for any
//! [`VariantSpec`]: normalise headers, filter, rename, derive, validate,
//! exclude, optionally aggregate, sort, then index and encode.

use std::time::Instant;

use polars::prelude::DataFrame;
use sphincter_model::{
    CoordinateIndex, ModelInput, Result, Schema, ValidatedDataset, VariantSpec,
};
use sphincter_validate::{project, validate_and_coerce};
use tracing::{debug, info, info_span, warn};

use crate::adapter::build_model_input;
use crate::aggregate::aggregate;
use crate::coords::build_coordinates;
use crate::derive::apply_derivations;
use crate::filter::apply_filters;
use crate::header::{apply_renames, normalize_headers};
use crate::sort::sort_rows;

/// Prepares one variant from its raw table.
///
/// Any failure aborts this variant only; the raw table is never modified.
pub fn build_variant(raw: &DataFrame, spec: &VariantSpec) -> Result<ValidatedDataset> {
    let span = info_span!("variant", name = %spec.name);
    let _guard = span.enter();
    let start = Instant::now();

    let table = info_span!("prepare").in_scope(|| -> Result<DataFrame> {
        let table = normalize_headers(raw, &spec.header)?;
        let table = apply_filters(&table, &spec.raw_filters)?;
        let table = apply_renames(&table, &spec.renames)?;
        let table = apply_derivations(&table, &spec.derivations)?;
        let table = apply_filters(&table, &spec.derived_filters)?;
        let dropped = raw.height().saturating_sub(table.height());
        if dropped > 0 {
            warn!(
                dropped,
                input_rows = raw.height(),
                output_rows = table.height(),
                "rows dropped by filters"
            );
        } else {
            debug!(rows = table.height(), "filters and derivations applied");
        }
        Ok(table)
    })?;

    let validated = info_span!("validate").in_scope(|| -> Result<DataFrame> {
        let validated = validate_and_coerce(&table, &spec.schema)?;
        let validated = apply_filters(&validated, &spec.exclusions)?;
        match &spec.aggregation {
            None => Ok(validated),
            Some(aggregation) => {
                let grouped = aggregate(&validated, aggregation)?;
                debug!(
                    input_rows = validated.height(),
                    groups = grouped.height(),
                    group_by = %aggregation.group_by,
                    "aggregated"
                );
                validate_and_coerce(&grouped, &aggregation.schema)
            }
        }
    })?;

    let schema = spec.output_schema();
    let measurements = project(&validated, schema)?;
    let measurements = sort_rows(&measurements, schema, &spec.sort_keys)?;
    let (coordinates, model_input) = index_and_encode(&measurements, schema, spec)?;

    info!(
        raw_rows = raw.height(),
        rows = measurements.height(),
        columns = measurements.width(),
        duration_ms = start.elapsed().as_millis(),
        "variant prepared"
    );
    Ok(ValidatedDataset::new(
        spec.name.clone(),
        coordinates,
        measurements,
        model_input,
    ))
}

/// Coordinates and model input of an already validated, sorted table.
pub fn index_and_encode(
    measurements: &DataFrame,
    schema: &Schema,
    spec: &VariantSpec,
) -> Result<(CoordinateIndex, ModelInput)> {
    let coordinates =
        build_coordinates(measurements, schema, &spec.dimensions, spec.coordinate_mode)?;
    let model_input = build_model_input(measurements, schema, &spec.layout)?;
    Ok((coordinates, model_input))
}
