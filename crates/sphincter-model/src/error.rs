use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::violation::SchemaError;

/// Errors raised while preparing, writing or reloading datasets.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error(transparent)]
    SchemaViolation(#[from] SchemaError),
    #[error("no schema family matches dataset name '{name}'")]
    UnknownDatasetName { name: String },
    #[error("unknown variant '{name}'")]
    UnknownVariant { name: String },
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },
    #[error("column '{column}' is invalid: {message}")]
    InvalidColumn { column: String, message: String },
    #[error("label '{label}' is not part of category '{category}'")]
    UnknownLabel { category: String, label: String },
    #[error("missing label in category '{category}' at row {row}")]
    MissingLabel { category: String, row: usize },
    #[error("malformed dataset document: {reason}")]
    MalformedDocument { reason: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataframe error: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for PrepError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl PrepError {
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// The collected schema violations, if this is a validation failure.
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::SchemaViolation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
