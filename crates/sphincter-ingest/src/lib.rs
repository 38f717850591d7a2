//! Raw table ingestion.
//!
//! Each study source (measurements, branch points, collaterals) arrives as
//! one single-header CSV export. Tables are loaded as-is; renaming, typing
//! and validation belong to the dataset builder.

mod error;
mod reader;
mod tables;

pub use error::{IngestError, Result};
pub use reader::{NULL_MARKERS, read_csv_table, validate_dataframe_shape, validate_encoding};
pub use tables::RawTables;
