//! JSON persistence for validated datasets.
//!
//! Loading never trusts the file: the measurements are re-validated against
//! the schema selected by the dataset name, and registered variants must
//! also reproduce their coordinates and model input.

mod document;
mod io;

pub use document::{DatasetDocument, MeasurementColumn};
pub use io::{deserialize, read_dataset, serialize, write_dataset};
