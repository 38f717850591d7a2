use polars::prelude::DataFrame;
use sphincter_common::frames_equal;

use crate::coords::CoordinateIndex;
use crate::model_input::ModelInput;

/// A fully validated, immutable dataset ready to persist.
#[derive(Debug, Clone)]
pub struct ValidatedDataset {
    name: String,
    coordinates: CoordinateIndex,
    measurements: DataFrame,
    model_input: ModelInput,
}

impl ValidatedDataset {
    pub fn new(
        name: impl Into<String>,
        coordinates: CoordinateIndex,
        measurements: DataFrame,
        model_input: ModelInput,
    ) -> Self {
        Self {
            name: name.into(),
            coordinates,
            measurements,
            model_input,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> &CoordinateIndex {
        &self.coordinates
    }

    pub fn measurements(&self) -> &DataFrame {
        &self.measurements
    }

    pub fn model_input(&self) -> &ModelInput {
        &self.model_input
    }

    pub fn row_count(&self) -> usize {
        self.measurements.height()
    }
}

impl PartialEq for ValidatedDataset {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.coordinates == other.coordinates
            && self.model_input == other.model_input
            && frames_equal(&self.measurements, &other.measurements)
    }
}
