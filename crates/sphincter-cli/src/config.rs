//! Run configuration: an optional TOML file overridden by command-line flags.
//!
//! ```toml
//! output_dir = "data/prepared"
//! excluded_mice = ["310321"]
//! variants = ["diameter", "pulsatility"]
//!
//! [sources]
//! measurements = "data/raw/data_sphincter_paper.csv"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sphincter_model::RawSource;
use sphincter_standards::StudyOptions;

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sphincter.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "data/prepared";
pub const DEFAULT_MEASUREMENTS: &str = "data/raw/data_sphincter_paper.csv";
pub const DEFAULT_BRANCHPOINTS: &str = "data/raw/angio-architecture/branchpoints.csv";
pub const DEFAULT_COLLATERALS: &str = "data/raw/angio-architecture/collaterals.csv";

/// Raw table locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcePaths {
    pub measurements: PathBuf,
    pub branchpoints: PathBuf,
    pub collaterals: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            measurements: PathBuf::from(DEFAULT_MEASUREMENTS),
            branchpoints: PathBuf::from(DEFAULT_BRANCHPOINTS),
            collaterals: PathBuf::from(DEFAULT_COLLATERALS),
        }
    }
}

impl SourcePaths {
    pub fn path(&self, source: RawSource) -> &Path {
        match source {
            RawSource::Measurements => &self.measurements,
            RawSource::Branchpoints => &self.branchpoints,
            RawSource::Collaterals => &self.collaterals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepareConfig {
    pub sources: SourcePaths,
    pub output_dir: PathBuf,
    pub excluded_mice: Vec<String>,
    /// Variants to build; empty builds every registered variant.
    pub variants: Vec<String>,
    #[serde(skip)]
    pub dry_run: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            sources: SourcePaths::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            excluded_mice: StudyOptions::default().excluded_mice,
            variants: Vec::new(),
            dry_run: false,
        }
    }
}

/// Flag values that replace configured ones when present.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub measurements: Option<PathBuf>,
    pub branchpoints: Option<PathBuf>,
    pub collaterals: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub variants: Vec<String>,
    pub excluded_mice: Vec<String>,
    pub dry_run: bool,
}

impl PrepareConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    /// Loads `path`, or `sphincter.toml` if it exists, or the defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config =
            Self::from_toml(&text).with_context(|| format!("load config {}", path.display()))?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.measurements {
            self.sources.measurements = path;
        }
        if let Some(path) = overrides.branchpoints {
            self.sources.branchpoints = path;
        }
        if let Some(path) = overrides.collaterals {
            self.sources.collaterals = path;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if !overrides.variants.is_empty() {
            self.variants = overrides.variants;
        }
        if !overrides.excluded_mice.is_empty() {
            self.excluded_mice = overrides.excluded_mice;
        }
        self.dry_run |= overrides.dry_run;
        self
    }

    pub fn study_options(&self) -> StudyOptions {
        StudyOptions::new().with_excluded_mice(self.excluded_mice.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_data_layout() {
        let config = PrepareConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("data/prepared"));
        assert_eq!(
            config.sources.path(RawSource::Measurements),
            Path::new("data/raw/data_sphincter_paper.csv")
        );
        assert_eq!(config.excluded_mice, vec!["310321".to_string()]);
        assert!(config.variants.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = PrepareConfig::from_toml(
            "variants = [\"branchpoints\"]\n\n[sources]\nbranchpoints = \"bp.csv\"\n",
        )
        .unwrap();
        assert_eq!(config.sources.branchpoints, PathBuf::from("bp.csv"));
        assert_eq!(config.sources.measurements, PathBuf::from(DEFAULT_MEASUREMENTS));
        assert_eq!(config.variants, vec!["branchpoints".to_string()]);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(PrepareConfig::from_toml("output = \"x\"\n").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let config = PrepareConfig::from_toml("output_dir = \"out\"\nexcluded_mice = []\n")
            .unwrap()
            .with_overrides(ConfigOverrides {
                output_dir: Some(PathBuf::from("elsewhere")),
                excluded_mice: vec!["40921".to_string()],
                dry_run: true,
                ..ConfigOverrides::default()
            });
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.excluded_mice, vec!["40921".to_string()]);
        assert!(config.dry_run);
        assert_eq!(config.study_options().excluded_mice, vec!["40921".to_string()]);
    }
}
