//! The typed record handed to the downstream index-based model.
//!
//! Field names on the wire are fixed by the model code that consumes them
//! (`N`, `N_mouse`, `ix_train`, ...). Integer codes are 1-based.

use serde::{Deserialize, Serialize};

/// Response values: one outcome per row, or several stacked outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Single(Vec<f64>),
    /// One inner vector per outcome, each of length `N`.
    Stacked(Vec<Vec<f64>>),
}

impl Outcome {
    pub fn rows(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Stacked(rows) => rows.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelInput {
    #[serde(rename = "N")]
    pub n: usize,
    #[serde(rename = "N_age")]
    pub n_age: usize,
    #[serde(rename = "N_mouse")]
    pub n_mouse: usize,
    #[serde(rename = "N_treatment", default, skip_serializing_if = "Option::is_none")]
    pub n_treatment: Option<usize>,
    #[serde(rename = "N_vessel_type", default, skip_serializing_if = "Option::is_none")]
    pub n_vessel_type: Option<usize>,
    #[serde(rename = "N_train")]
    pub n_train: usize,
    #[serde(rename = "N_test")]
    pub n_test: usize,
    /// Per-row age code, taken from the row's subject.
    pub age: Vec<usize>,
    /// Per-subject age code, indexed by `mouse - 1`.
    pub mouse_age: Vec<usize>,
    pub mouse: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_type: Option<Vec<usize>>,
    pub ix_train: Vec<usize>,
    pub ix_test: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyper: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<Vec<f64>>,
    #[serde(rename = "K", default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
    /// Covariate matrix, one row of `K` values per observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Vec<f64>>>,
}
