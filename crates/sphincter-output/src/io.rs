use std::fs;
use std::path::{Path, PathBuf};

use sphincter_model::{PrepError, Result, ValidatedDataset};
use sphincter_standards::StudyRegistry;
use tracing::{debug, info};

use crate::document::DatasetDocument;

/// Renders a dataset as a pretty-printed JSON document.
pub fn serialize(dataset: &ValidatedDataset) -> Result<String> {
    let document = DatasetDocument::from_dataset(dataset)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parses and fully re-validates a dataset document.
pub fn deserialize(text: &str, registry: &StudyRegistry) -> Result<ValidatedDataset> {
    let document: DatasetDocument =
        serde_json::from_str(text).map_err(|err| PrepError::malformed(err.to_string()))?;
    document.into_dataset(registry)
}

/// Writes `<dir>/<name>.json`, creating `dir` when needed.
pub fn write_dataset(dir: &Path, dataset: &ValidatedDataset) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| PrepError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.json", dataset.name()));
    let text = serialize(dataset)?;
    fs::write(&path, text).map_err(|source| PrepError::Write {
        path: path.clone(),
        source,
    })?;
    info!(
        dataset = dataset.name(),
        rows = dataset.row_count(),
        path = %path.display(),
        "dataset written"
    );
    Ok(path)
}

pub fn read_dataset(path: &Path, registry: &StudyRegistry) -> Result<ValidatedDataset> {
    let text = fs::read_to_string(path).map_err(|source| PrepError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = deserialize(&text, registry)?;
    debug!(
        dataset = dataset.name(),
        rows = dataset.row_count(),
        path = %path.display(),
        "dataset loaded"
    );
    Ok(dataset)
}
