//! Error types for raw table ingestion.

use std::path::PathBuf;
use thiserror::Error;

use sphincter_model::RawSource;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// UTF-16 files are rejected; re-export them as UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("CSV file has no data rows: {path}")]
    EmptyCsv { path: PathBuf },

    #[error("CSV file has an empty column name: {path}")]
    EmptyColumnName { path: PathBuf },

    #[error("no {table} table was loaded")]
    SourceNotLoaded { table: RawSource },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
