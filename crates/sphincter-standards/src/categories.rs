//! Ordered category domains used by the study schemas.

use sphincter_model::OrderedCategory;

pub const AGE_LEVELS: &[&str] = &["adult", "old"];

/// Treatments of the diameter experiments.
pub const DIAMETER_TREATMENTS: &[&str] = &["baseline", "after_hyper", "after_ablation"];

/// Treatments of the pulsatility experiments, including the hypertension phases.
pub const PULSATILITY_TREATMENTS: &[&str] =
    &["baseline", "hyper", "after_hyper", "after_ablation", "hyper2"];

pub const DIAMETER_VESSEL_TYPES: &[&str] = &["pen_art", "sphincter", "bulb", "cap1", "cap2"];

pub const PULSATILITY_VESSEL_TYPES: &[&str] =
    &["pen_art", "bulb", "cap1", "cap2", "cap3", "cap4", "cap5"];

/// Treatments during which blood pressure was raised.
pub const HYPER_TREATMENTS: &[&str] = &["hyper", "hyper2"];

pub fn age() -> OrderedCategory {
    OrderedCategory::new("age", AGE_LEVELS.iter().copied())
}

pub fn diameter_treatment() -> OrderedCategory {
    OrderedCategory::new("treatment", DIAMETER_TREATMENTS.iter().copied())
}

pub fn pulsatility_treatment() -> OrderedCategory {
    OrderedCategory::new("treatment", PULSATILITY_TREATMENTS.iter().copied())
}

pub fn diameter_vessel_type() -> OrderedCategory {
    OrderedCategory::new("vessel_type", DIAMETER_VESSEL_TYPES.iter().copied())
}

pub fn pulsatility_vessel_type() -> OrderedCategory {
    OrderedCategory::new("vessel_type", PULSATILITY_VESSEL_TYPES.iter().copied())
}
