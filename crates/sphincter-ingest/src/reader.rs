//! CSV reading of raw tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, NullValues, SerReader};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Cell texts read as missing, on top of empty cells.
pub const NULL_MARKERS: &[&str] = &["NA", "NaN", "nan", "#N/A"];

fn open_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Rejects UTF-16 files by their byte order mark. A UTF-8 mark is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Checks a loaded table has rows and named columns.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if df
        .get_column_names()
        .iter()
        .any(|name| name.trim().is_empty())
    {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn null_markers() -> NullValues {
    NullValues::AllColumns(NULL_MARKERS.iter().map(|&m| m.into()).collect())
}

/// Reads a single-header CSV file into a DataFrame.
///
/// Column types are inferred; the builder coerces them against the variant
/// schema later, so inference only has to be lossless.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| options.with_null_values(Some(null_markers())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let df = strip_bom(df)?;
    validate_dataframe_shape(&df, path)?;
    if df.width() == 1 {
        warn!(
            path = %path.display(),
            "CSV has a single column; check the delimiter"
        );
    }
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "CSV loaded"
    );
    Ok(df)
}

/// Removes a UTF-8 byte order mark polars kept in the first header.
fn strip_bom(mut df: DataFrame) -> Result<DataFrame> {
    let first = df
        .get_column_names()
        .first()
        .map(|name| name.to_string());
    if let Some(first) = first
        && let Some(stripped) = first.strip_prefix('\u{feff}')
    {
        df.rename(&first, stripped.into())?;
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table() {
        let file = create_temp_csv("age,mouse,pressure_d\nadult,40921,60.5\nold,50101,NA\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        let pressure = df.column("pressure_d").unwrap();
        assert_eq!(pressure.null_count(), 1);
    }

    #[test]
    fn test_every_null_marker_reads_as_null() {
        let file = create_temp_csv("mouse,pd2\n1,NA\n2,NaN\n3,nan\n4,#N/A\n5,0.5\n");
        let df = read_csv_table(file.path()).unwrap();

        let pd2 = df.column("pd2").unwrap();
        assert_eq!(pd2.null_count(), 4);
    }

    #[test]
    fn test_read_csv_table_with_bom() {
        let file = create_temp_csv("\u{feff}Date,Age\n20230201,Adult\n");
        let df = read_csv_table(file.path()).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Date", "Age"]);
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = create_temp_csv("A,B,C\n");
        let result = read_csv_table(file.path());

        assert!(matches!(
            result,
            Err(IngestError::EmptyCsv { .. } | IngestError::CsvParse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_table(Path::new("does/not/exist.csv"));

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_utf16_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'A', 0]).unwrap();
        let result = validate_encoding(file.path());

        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }
}
