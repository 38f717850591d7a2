//! Capillary branchpoints off penetrating arterioles.
//!
//! Source: the branchpoints sheet, exported to CSV. Its headers are free-form
//! (`1.ord/PA`, `Sphinc_diam`, ...) and are normalised before any other step.

use std::sync::Arc;

use sphincter_model::{
    ColumnSpec, CoordinateMode, Derivation, DimensionSpec, HeaderRule, ModelInputLayout,
    OutcomeSpec, RawSource, RowFilter, Schema, Threshold, VariantSpec,
};

use crate::categories;

pub const PREFIX: &str = "branchpoints";

/// A branch whose neck is narrower than this fraction of the first-order
/// capillary has a sphincter.
pub const SPHINCTER_RATIO: f64 = 0.8;
/// A branch whose bulb is wider than this multiple of the first-order
/// capillary has a bulb.
pub const BULB_RATIO: f64 = 1.25;
/// Upper cap on the first-order/PA diameter ratio before the logit.
pub const FIRSTORDER_PER_PA_MAX: f64 = 0.98;

pub const OUTCOMES: &[&str] = &["is_sphincter", "is_bulb"];
pub const COVARIATES: &[&str] = &["branch_number", "ln_depth", "logit_firstorder_per_pa"];

pub fn header_rules() -> Vec<HeaderRule> {
    vec![
        HeaderRule::Lowercase,
        HeaderRule::replace("1.", "first"),
        HeaderRule::replace("bulb_diam", "bulb_diameter"),
        HeaderRule::replace("sphinc_diam", "sphincter_diameter"),
        HeaderRule::replace("firstord_diam", "firstorder_diameter"),
        HeaderRule::replace("neck", "sphincter"),
        HeaderRule::replace("/", "_per_"),
        HeaderRule::replace(" ", ""),
    ]
}

pub fn schema() -> Schema {
    Schema::new(
        PREFIX,
        vec![
            ColumnSpec::ordered("age", categories::age()),
            ColumnSpec::lexical("mouse_id"),
            ColumnSpec::text("pa_number"),
            ColumnSpec::text("branch_id"),
            ColumnSpec::float("branch_number"),
            ColumnSpec::float("depth").ge(0.0),
            ColumnSpec::float("ln_depth"),
            ColumnSpec::float("sphincter_diameter").gt(0.0),
            ColumnSpec::float("firstorder_diameter").gt(0.0),
            ColumnSpec::float("bulb_diameter").gt(0.0).nullable(),
            ColumnSpec::float("firstorder_per_pa").gt(0.0).le(FIRSTORDER_PER_PA_MAX),
            ColumnSpec::float("logit_firstorder_per_pa"),
            ColumnSpec::boolean("is_sphincter"),
            ColumnSpec::boolean("is_bulb"),
        ],
    )
}

pub fn variants(schema: &Arc<Schema>) -> Vec<VariantSpec> {
    let layout = ModelInputLayout {
        outcome: Some(OutcomeSpec::Stacked(
            OUTCOMES.iter().map(ToString::to_string).collect(),
        )),
        covariates: COVARIATES.iter().map(ToString::to_string).collect(),
        ..ModelInputLayout::new("mouse_id", "age")
    };
    let mut variant =
        VariantSpec::new(PREFIX, RawSource::Branchpoints, Arc::clone(schema), layout);
    for rule in header_rules() {
        variant = variant.header_rule(rule);
    }
    let variant = variant
        .derive(Derivation::to_text("mouse_id", "date"))
        .derive(Derivation::lowercase("age", "age"))
        .derive(Derivation::to_text("pa_number", "pa_number"))
        .derive(Derivation::to_text("branch_id", "branch_number"))
        .derive(Derivation::ratio_threshold(
            "is_sphincter",
            "sphincter_diameter",
            "firstorder_diameter",
            SPHINCTER_RATIO,
            Threshold::Below,
        ))
        .derive(Derivation::ratio_threshold(
            "is_bulb",
            "bulb_diameter",
            "firstorder_diameter",
            BULB_RATIO,
            Threshold::Above,
        ))
        .derive(Derivation::clip("firstorder_per_pa", FIRSTORDER_PER_PA_MAX))
        .derive(Derivation::log1p("ln_depth", "depth"))
        .derive(Derivation::logit("logit_firstorder_per_pa", "firstorder_per_pa"))
        .derived_filter(RowFilter::not_null([
            "is_sphincter",
            "is_bulb",
            "sphincter_diameter",
            "firstorder_diameter",
            "logit_firstorder_per_pa",
        ]))
        .sort_by(["age", "mouse_id", "pa_number", "branch_id"])
        .dimension(DimensionSpec::column("mouse", "mouse_id"))
        .dimension(DimensionSpec::column("age", "age"))
        .dimension(DimensionSpec::constant("outcome", OUTCOMES.iter().copied()))
        .dimension(DimensionSpec::constant("covariate", COVARIATES.iter().copied()))
        .dimension(DimensionSpec::observation())
        .coordinate_mode(CoordinateMode::Declared);
    vec![variant]
}
