pub mod category;
pub mod coords;
pub mod dataset;
pub mod error;
pub mod model_input;
pub mod schema;
pub mod variant;
pub mod violation;

pub use category::{CategoryDomain, OrderedCategory};
pub use coords::{CoordinateIndex, CoordinateMode};
pub use dataset::ValidatedDataset;
pub use error::{PrepError, Result};
pub use model_input::{ModelInput, Outcome};
pub use schema::{ColumnSpec, ColumnType, Constraint, Schema};
pub use variant::{
    AggregateColumn, Aggregation, Derivation, DimensionSpec, HeaderRule, IndicatorSpec,
    ModelInputLayout, OutcomeSpec, RawSource, RowFilter, Threshold, VariantSpec,
};
pub use violation::{SchemaError, SchemaViolation, ViolationReason};
