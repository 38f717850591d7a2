//! Vessel diameter response to stimulation.
//!
//! Source: the `measurements` table. One row per vessel, treatment and mouse
//! with the mean diameter before and the maximum diameter after stimulation.

use std::sync::Arc;

use sphincter_model::{
    ColumnSpec, CoordinateMode, Derivation, DimensionSpec, ModelInputLayout, OutcomeSpec,
    RawSource, RowFilter, Schema, VariantSpec,
};

use crate::categories;
use crate::options::StudyOptions;

pub const PREFIX: &str = "diameter";

pub fn schema() -> Schema {
    Schema::new(
        PREFIX,
        vec![
            ColumnSpec::ordered("age", categories::age()),
            ColumnSpec::lexical("mouse"),
            ColumnSpec::ordered("vessel_type", categories::diameter_vessel_type()),
            ColumnSpec::ordered("treatment", categories::diameter_treatment()),
            ColumnSpec::float("pressure_d").gt(0.0).nullable(),
            ColumnSpec::float("diam_before").gt(0.0),
            ColumnSpec::float("diam_after").gt(0.0),
            ColumnSpec::float("diam_change"),
            ColumnSpec::float("diam_log_ratio"),
            ColumnSpec::float("diam_rel_change"),
        ],
    )
}

/// `diameter`, `diameter-rel` and `diameter-log-ratio`.
pub fn variants(schema: &Arc<Schema>, options: &StudyOptions) -> Vec<VariantSpec> {
    let base = base_variant(schema, options);
    let rel = base.clone().named("diameter-rel").layout(ModelInputLayout {
        outcome: Some(OutcomeSpec::Single("diam_rel_change".to_string())),
        ..layout()
    });
    let log_ratio = base.clone().named("diameter-log-ratio").layout(ModelInputLayout {
        outcome: Some(OutcomeSpec::Single("diam_log_ratio".to_string())),
        ..layout()
    });
    vec![base, rel, log_ratio]
}

fn layout() -> ModelInputLayout {
    ModelInputLayout {
        treatment: Some("treatment".to_string()),
        vessel_type: Some("vessel_type".to_string()),
        ..ModelInputLayout::new("mouse", "age")
    }
}

fn base_variant(schema: &Arc<Schema>, options: &StudyOptions) -> VariantSpec {
    VariantSpec::new(PREFIX, RawSource::Measurements, Arc::clone(schema), layout())
        .raw_filter(RowFilter::not_null([
            "diam_max_after_stim",
            "diam_mean_before_stim",
        ]))
        .raw_filter(RowFilter::not_in("mouse", options.excluded_mice.iter().cloned()))
        .rename("diam_mean_before_stim", "diam_before")
        .rename("diam_max_after_stim", "diam_after")
        .rename("vessel", "vessel_type")
        .derive(Derivation::to_text("mouse", "mouse"))
        .derive(Derivation::difference("diam_change", "diam_after", "diam_before"))
        .derive(Derivation::log_ratio("diam_log_ratio", "diam_after", "diam_before"))
        .derive(Derivation::relative_change("diam_rel_change", "diam_after", "diam_before"))
        .sort_by(["age", "mouse", "vessel_type", "treatment"])
        .dimension(DimensionSpec::column("mouse", "mouse"))
        .dimension(DimensionSpec::column("vessel_type", "vessel_type"))
        .dimension(DimensionSpec::column("age", "age"))
        .dimension(DimensionSpec::column("treatment", "treatment"))
        .dimension(DimensionSpec::observation())
        .coordinate_mode(CoordinateMode::Declared)
}
