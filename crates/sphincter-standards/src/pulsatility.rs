//! Pulsatility of vessel diameter and center-line position.
//!
//! Source: the `measurements` table. Harmonic power is measured for the
//! diameter (`pd*`) and center (`pc*`) signals; the first harmonic is always
//! present, the second and third may be missing.

use std::sync::Arc;

use sphincter_model::{
    ColumnSpec, CoordinateMode, Derivation, DimensionSpec, IndicatorSpec, ModelInputLayout,
    OutcomeSpec, RawSource, RowFilter, Schema, VariantSpec,
};

use crate::categories::{self, HYPER_TREATMENTS};
use crate::options::StudyOptions;

pub const PREFIX: &str = "pulsatility";

/// Labels of the two stacked outcome rows.
pub const MEASUREMENT_TYPES: &[&str] = &["diameter", "center"];

pub fn schema() -> Schema {
    Schema::new(
        PREFIX,
        vec![
            ColumnSpec::ordered("age", categories::age()),
            ColumnSpec::lexical("mouse"),
            ColumnSpec::ordered("vessel_type", categories::pulsatility_vessel_type()),
            ColumnSpec::ordered("treatment", categories::pulsatility_treatment()),
            ColumnSpec::float("pd1").gt(0.0),
            ColumnSpec::float("pd2").gt(0.0).nullable(),
            ColumnSpec::float("pd3").gt(0.0).nullable(),
            ColumnSpec::float("pd_sum").gt(0.0),
            ColumnSpec::float("pd_ratio").ge(0.0),
            ColumnSpec::float("pc1").gt(0.0),
            ColumnSpec::float("pc2").gt(0.0).nullable(),
            ColumnSpec::float("pc3").gt(0.0).nullable(),
            ColumnSpec::float("pc_sum").gt(0.0),
            ColumnSpec::float("pc_ratio").ge(0.0),
            ColumnSpec::float("pressure_d").gt(0.0),
            ColumnSpec::float("pressure_norm"),
            ColumnSpec::float("diameter").gt(0.0),
            ColumnSpec::float("diameter_norm"),
        ],
    )
}

/// `pulsatility`, `pulsatility-no-hyper` and `pulsatility-raw-pressure`.
pub fn variants(schema: &Arc<Schema>, options: &StudyOptions) -> Vec<VariantSpec> {
    let base = base_variant(schema, options);
    let no_hyper = base
        .clone()
        .named("pulsatility-no-hyper")
        .exclude(RowFilter::not_in("treatment", HYPER_TREATMENTS.iter().copied()))
        .coordinate_mode(CoordinateMode::Observed);
    let raw_pressure = base
        .clone()
        .named("pulsatility-raw-pressure")
        .layout(ModelInputLayout {
            pressure: Some("pressure_d".to_string()),
            ..layout()
        });
    vec![base, no_hyper, raw_pressure]
}

fn layout() -> ModelInputLayout {
    ModelInputLayout {
        treatment: Some("treatment".to_string()),
        vessel_type: Some("vessel_type".to_string()),
        outcome: Some(OutcomeSpec::Stacked(vec![
            "pd_sum".to_string(),
            "pc_sum".to_string(),
        ])),
        hyper: Some(IndicatorSpec {
            column: "treatment".to_string(),
            labels: HYPER_TREATMENTS.iter().map(ToString::to_string).collect(),
        }),
        pressure: Some("pressure_norm".to_string()),
        diameter: Some("diameter".to_string()),
        ..ModelInputLayout::new("mouse", "age")
    }
}

fn base_variant(schema: &Arc<Schema>, options: &StudyOptions) -> VariantSpec {
    VariantSpec::new(PREFIX, RawSource::Measurements, Arc::clone(schema), layout())
        .raw_filter(RowFilter::not_null([
            "power_diam_h1",
            "power_center_h1",
            "pressure_d",
        ]))
        .raw_filter(RowFilter::not_in("mouse", options.excluded_mice.iter().cloned()))
        .rename("vessel", "vessel_type")
        .rename("power_diam_h1", "pd1")
        .rename("power_diam_h2", "pd2")
        .rename("power_diam_h3", "pd3")
        .rename("power_center_h1", "pc1")
        .rename("power_center_h2", "pc2")
        .rename("power_center_h3", "pc3")
        .rename("diam_mean", "diameter")
        .derive(Derivation::to_text("mouse", "mouse"))
        .derive(Derivation::row_sum("pd_sum", &["pd1", "pd2", "pd3"]))
        .derive(Derivation::row_sum("pc_sum", &["pc1", "pc2", "pc3"]))
        .derive(Derivation::filled_ratio("pd_ratio", "pd2", "pd_sum"))
        .derive(Derivation::filled_ratio("pc_ratio", "pc2", "pc_sum"))
        .derive(Derivation::center_by_group("pressure_norm", "pressure_d", "age"))
        .derive(Derivation::center_by_group("diameter_norm", "diameter", "vessel_type"))
        .sort_by(["age", "mouse", "vessel_type", "treatment"])
        .dimension(DimensionSpec::constant("measurement_type", MEASUREMENT_TYPES.iter().copied()))
        .dimension(DimensionSpec::column("mouse", "mouse"))
        .dimension(DimensionSpec::column("vessel_type", "vessel_type"))
        .dimension(DimensionSpec::column("age", "age"))
        .dimension(DimensionSpec::column("treatment", "treatment"))
        .dimension(DimensionSpec::observation())
        .coordinate_mode(CoordinateMode::Declared)
}
