//! Batch preparation with explicit stages.
//!
//! 1. **Ingest**: load every raw table the selected variants read
//! 2. **Build**: filter, derive, validate and encode each variant
//! 3. **Output**: write one `<name>.json` per built variant
//!
//! Variants are independent: a failure is recorded against its variant and
//! the remaining variants still run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, info_span, warn};

use sphincter_ingest::RawTables;
use sphincter_model::{RawSource, ValidatedDataset, VariantSpec};
use sphincter_output::{read_dataset, write_dataset};
use sphincter_standards::StudyRegistry;
use sphincter_transform::build_variant;

use crate::config::{PrepareConfig, SourcePaths};

#[derive(Debug, Clone, PartialEq)]
pub enum VariantStatus {
    Written { path: PathBuf },
    /// Built and validated under `--dry-run`.
    Checked,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantSummary {
    pub name: String,
    pub source: RawSource,
    pub rows: Option<usize>,
    pub subjects: Option<usize>,
    pub status: VariantStatus,
}

impl VariantSummary {
    fn built(dataset: &ValidatedDataset, source: RawSource, status: VariantStatus) -> Self {
        Self {
            name: dataset.name().to_string(),
            source,
            rows: Some(dataset.row_count()),
            subjects: Some(dataset.model_input().n_mouse),
            status,
        }
    }

    fn failed(spec: &VariantSpec, error: String) -> Self {
        Self {
            name: spec.name.clone(),
            source: spec.source,
            rows: None,
            subjects: None,
            status: VariantStatus::Failed { error },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, VariantStatus::Failed { .. })
    }
}

#[derive(Debug)]
pub struct PrepareResult {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub variants: Vec<VariantSummary>,
}

impl PrepareResult {
    pub fn has_errors(&self) -> bool {
        self.variants.iter().any(VariantSummary::is_failed)
    }

    pub fn failed_count(&self) -> usize {
        self.variants.iter().filter(|v| v.is_failed()).count()
    }
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

#[derive(Debug, Default)]
pub struct IngestResult {
    pub tables: RawTables,
    /// Load failures keyed by source; variants reading them fail with this message.
    pub errors: BTreeMap<RawSource, String>,
}

/// Loads the raw tables `variants` read, each once.
pub fn ingest(sources: &SourcePaths, variants: &[&VariantSpec]) -> IngestResult {
    let needed: BTreeSet<RawSource> = variants.iter().map(|spec| spec.source).collect();
    let mut result = IngestResult::default();
    for source in needed {
        let path = sources.path(source);
        if let Err(err) = result.tables.load(source, path) {
            warn!(source = source.as_str(), error = %err, "raw table not loaded");
            result.errors.insert(source, err.to_string());
        }
    }
    result
}

// ============================================================================
// Stage 2 and 3: Build and output
// ============================================================================

fn prepare_one(
    spec: &VariantSpec,
    ingested: &IngestResult,
    output_dir: &Path,
    dry_run: bool,
) -> std::result::Result<VariantSummary, String> {
    if let Some(err) = ingested.errors.get(&spec.source) {
        return Err(err.clone());
    }
    let raw = ingested.tables.get(spec.source).map_err(|e| e.to_string())?;
    let dataset = build_variant(raw, spec).map_err(|e| e.to_string())?;
    let status = if dry_run {
        VariantStatus::Checked
    } else {
        let path = write_dataset(output_dir, &dataset).map_err(|e| e.to_string())?;
        VariantStatus::Written { path }
    };
    Ok(VariantSummary::built(&dataset, spec.source, status))
}

/// Runs every selected variant.
///
/// Only configuration problems (an unknown variant name) fail the whole
/// run; per-variant failures are reported in the result.
pub fn prepare(config: &PrepareConfig) -> Result<PrepareResult> {
    let registry = StudyRegistry::new(&config.study_options());
    let selected = registry
        .select(&config.variants)
        .context("select variants")?;

    let start = Instant::now();
    let ingested = info_span!("ingest").in_scope(|| ingest(&config.sources, &selected));

    let mut variants = Vec::with_capacity(selected.len());
    for spec in selected {
        let summary = match prepare_one(spec, &ingested, &config.output_dir, config.dry_run) {
            Ok(summary) => summary,
            Err(err) => {
                error!(variant = %spec.name, error = %err, "variant failed");
                VariantSummary::failed(spec, err)
            }
        };
        variants.push(summary);
    }

    let result = PrepareResult {
        output_dir: config.output_dir.clone(),
        dry_run: config.dry_run,
        variants,
    };
    info!(
        variants = result.variants.len(),
        failed = result.failed_count(),
        duration_ms = start.elapsed().as_millis(),
        "preparation finished"
    );
    Ok(result)
}

// ============================================================================
// Variants
// ============================================================================

/// A registered variant as it would be built under a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantListing {
    pub name: String,
    pub source: RawSource,
    pub schema: String,
    pub dimensions: Vec<String>,
    pub excluded_mice: Vec<String>,
}

/// Lists every registered variant with the configured subject exclusions.
pub fn list_variants(config: &PrepareConfig) -> Vec<VariantListing> {
    let registry = StudyRegistry::new(&config.study_options());
    registry
        .families()
        .iter()
        .flat_map(|family| {
            family.variants.iter().map(|variant| VariantListing {
                name: variant.name.clone(),
                source: variant.source,
                schema: family.schema.name().to_string(),
                dimensions: variant
                    .dimensions
                    .iter()
                    .map(|dimension| dimension.name().to_string())
                    .collect(),
                excluded_mice: variant
                    .excluded_values("mouse")
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

// ============================================================================
// Inspect
// ============================================================================

#[derive(Debug)]
pub struct InspectSummary {
    pub path: PathBuf,
    pub outcome: std::result::Result<DatasetOverview, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub subjects: usize,
    /// Dimension names with their label counts.
    pub dimensions: Vec<(String, usize)>,
}

impl DatasetOverview {
    pub fn of(dataset: &ValidatedDataset) -> Self {
        Self {
            name: dataset.name().to_string(),
            rows: dataset.row_count(),
            columns: dataset.measurements().width(),
            subjects: dataset.model_input().n_mouse,
            dimensions: dataset
                .coordinates()
                .iter()
                .map(|(name, labels)| (name.to_string(), labels.len()))
                .collect(),
        }
    }
}

/// Reloads and re-validates each persisted dataset.
pub fn inspect(paths: &[PathBuf], registry: &StudyRegistry) -> Vec<InspectSummary> {
    paths
        .iter()
        .map(|path| {
            let outcome = read_dataset(path, registry)
                .map(|dataset| DatasetOverview::of(&dataset))
                .map_err(|err| {
                    error!(path = %path.display(), error = %err, "dataset rejected");
                    err.to_string()
                });
            InspectSummary {
                path: path.clone(),
                outcome,
            }
        })
        .collect()
}
