//! Collateral vessels between arteriole trees.
//!
//! Source: the collaterals sheet, exported to CSV, one row per collateral.
//! The `collaterals-mice` variant collapses it into one row per mouse.

use std::sync::Arc;

use sphincter_model::{
    AggregateColumn, Aggregation, ColumnSpec, CoordinateMode, Derivation, DimensionSpec,
    ModelInputLayout, OutcomeSpec, RawSource, RowFilter, Schema, VariantSpec,
};

use crate::categories;

pub const PREFIX: &str = "collaterals";
pub const MICE_PREFIX: &str = "collaterals-mice";

/// Craniotomy areas are recorded in square micrometres.
pub const AREA_SCALE: f64 = 1e-6;

pub const OUTCOMES: &[&str] = &["ln_diameter_mean", "ln_curved_length", "ln_tortuosity"];

pub fn schema() -> Schema {
    Schema::new(
        PREFIX,
        vec![
            ColumnSpec::ordered("age", categories::age()),
            ColumnSpec::lexical("mouse_id"),
            ColumnSpec::text("collateral_id").unique(),
            ColumnSpec::float("diameter_mean").gt(0.0),
            ColumnSpec::float("diameter_sd").ge(0.0),
            ColumnSpec::float("curved_length").gt(0.0),
            ColumnSpec::float("straight_line_distance").gt(0.0),
            ColumnSpec::float("tortuosity").ge(1.0),
            ColumnSpec::float("ln_curved_length"),
            ColumnSpec::float("ln_diameter_mean"),
            ColumnSpec::float("ln_tortuosity"),
        ],
    )
}

/// Per-mouse counts of collaterals.
pub fn mice_schema() -> Schema {
    Schema::new(
        MICE_PREFIX,
        vec![
            ColumnSpec::ordered("age", categories::age()),
            ColumnSpec::lexical("mouse_id"),
            ColumnSpec::float("craniotomy_area").gt(0.0),
            ColumnSpec::integer("collaterals").ge(0.0),
            ColumnSpec::float("collaterals_per_area").ge(0.0),
            ColumnSpec::float("ln_collaterals_per_area"),
        ],
    )
}

/// The per-collateral variant.
pub fn variants(schema: &Arc<Schema>) -> Vec<VariantSpec> {
    let layout = ModelInputLayout {
        outcome: Some(OutcomeSpec::Stacked(
            OUTCOMES.iter().map(ToString::to_string).collect(),
        )),
        ..ModelInputLayout::new("mouse_id", "age")
    };
    vec![
        row_variant(schema, layout)
            .sort_by(["age", "mouse_id", "collateral_id"])
            .dimension(DimensionSpec::column("mouse", "mouse_id"))
            .dimension(DimensionSpec::column("age", "age"))
            .dimension(DimensionSpec::constant("outcome", OUTCOMES.iter().copied()))
            .dimension(DimensionSpec::observation()),
    ]
}

/// The per-mouse variant, aggregated from validated collaterals.
pub fn mice_variants(schema: &Arc<Schema>, mice_schema: &Arc<Schema>) -> Vec<VariantSpec> {
    let layout = ModelInputLayout {
        outcome: Some(OutcomeSpec::Single("ln_collaterals_per_area".to_string())),
        ..ModelInputLayout::new("mouse_id", "age")
    };
    let aggregation = Aggregation {
        group_by: "mouse_id".to_string(),
        columns: vec![
            AggregateColumn::First {
                target: "age".to_string(),
                column: "age".to_string(),
            },
            AggregateColumn::FirstScaled {
                target: "craniotomy_area".to_string(),
                column: "Craniotomy_area".to_string(),
                factor: AREA_SCALE,
            },
            AggregateColumn::Count {
                target: "collaterals".to_string(),
            },
        ],
        derivations: vec![
            Derivation::ratio("collaterals_per_area", "collaterals", "craniotomy_area"),
            Derivation::log("ln_collaterals_per_area", "collaterals_per_area"),
        ],
        schema: Arc::clone(mice_schema),
    };
    vec![
        row_variant(schema, layout)
            .named(MICE_PREFIX)
            .aggregate(aggregation)
            .sort_by(["age", "mouse_id"])
            .dimension(DimensionSpec::column("mouse", "mouse_id"))
            .dimension(DimensionSpec::column("age", "age"))
            .dimension(DimensionSpec::observation()),
    ]
}

fn row_variant(schema: &Arc<Schema>, layout: ModelInputLayout) -> VariantSpec {
    VariantSpec::new(PREFIX, RawSource::Collaterals, Arc::clone(schema), layout)
        .raw_filter(RowFilter::not_null([
            "Distance",
            "CurvedLength",
            "Mean_diameter",
            "SD",
        ]))
        .raw_filter(RowFilter::at_most("Distance", "CurvedLength"))
        .derive(Derivation::concat("collateral_id", &["Date", "CollateralNumber"]))
        .derive(Derivation::to_text("mouse_id", "Date"))
        .derive(Derivation::lowercase("age", "Age"))
        .derive(Derivation::copy("diameter_mean", "Mean_diameter"))
        .derive(Derivation::copy("diameter_sd", "SD"))
        .derive(Derivation::copy("curved_length", "CurvedLength"))
        .derive(Derivation::copy("straight_line_distance", "Distance"))
        .derive(Derivation::ratio("tortuosity", "CurvedLength", "Distance"))
        .derive(Derivation::log("ln_diameter_mean", "diameter_mean"))
        .derive(Derivation::log("ln_curved_length", "curved_length"))
        .derive(Derivation::log("ln_tortuosity", "tortuosity"))
        .coordinate_mode(CoordinateMode::Declared)
}
