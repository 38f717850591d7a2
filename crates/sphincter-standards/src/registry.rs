//! Registry of schema families and their variants.
//!
//! Every dataset name starts with the prefix of the family whose schema it
//! conforms to. Loading a persisted dataset dispatches on the longest
//! matching prefix, so `collaterals-mice` resolves to its own family rather
//! than to `collaterals`.

use std::sync::Arc;

use sphincter_model::{PrepError, Result, Schema, VariantSpec};

use crate::options::StudyOptions;
use crate::{branchpoints, collaterals, diameter, pulsatility};

/// Variants sharing one output schema.
#[derive(Debug, Clone)]
pub struct SchemaFamily {
    pub prefix: String,
    pub schema: Arc<Schema>,
    pub variants: Vec<VariantSpec>,
}

impl SchemaFamily {
    /// Whether `name` belongs to this family: the prefix itself, or the
    /// prefix followed by a `-suffix`.
    pub fn matches(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
    }
}

#[derive(Debug, Clone)]
pub struct StudyRegistry {
    families: Vec<SchemaFamily>,
}

impl Default for StudyRegistry {
    fn default() -> Self {
        Self::new(&StudyOptions::default())
    }
}

impl StudyRegistry {
    /// Builds every family of the study.
    pub fn new(options: &StudyOptions) -> Self {
        let diameter_schema = Arc::new(diameter::schema());
        let pulsatility_schema = Arc::new(pulsatility::schema());
        let branchpoints_schema = Arc::new(branchpoints::schema());
        let collaterals_schema = Arc::new(collaterals::schema());
        let mice_schema = Arc::new(collaterals::mice_schema());

        let families = vec![
            SchemaFamily {
                prefix: diameter::PREFIX.to_string(),
                variants: diameter::variants(&diameter_schema, options),
                schema: diameter_schema,
            },
            SchemaFamily {
                prefix: pulsatility::PREFIX.to_string(),
                variants: pulsatility::variants(&pulsatility_schema, options),
                schema: pulsatility_schema,
            },
            SchemaFamily {
                prefix: branchpoints::PREFIX.to_string(),
                variants: branchpoints::variants(&branchpoints_schema),
                schema: branchpoints_schema,
            },
            SchemaFamily {
                prefix: collaterals::MICE_PREFIX.to_string(),
                variants: collaterals::mice_variants(&collaterals_schema, &mice_schema),
                schema: mice_schema,
            },
            SchemaFamily {
                prefix: collaterals::PREFIX.to_string(),
                variants: collaterals::variants(&collaterals_schema),
                schema: collaterals_schema,
            },
        ];
        Self { families }
    }

    pub fn families(&self) -> &[SchemaFamily] {
        &self.families
    }

    /// The family with the longest prefix matching `name`.
    pub fn family_for(&self, name: &str) -> Result<&SchemaFamily> {
        self.families
            .iter()
            .filter(|family| family.matches(name))
            .max_by_key(|family| family.prefix.len())
            .ok_or_else(|| PrepError::UnknownDatasetName {
                name: name.to_string(),
            })
    }

    /// The schema a dataset called `name` must conform to.
    pub fn schema_for(&self, name: &str) -> Result<&Arc<Schema>> {
        self.family_for(name).map(|family| &family.schema)
    }

    pub fn variants(&self) -> impl Iterator<Item = &VariantSpec> {
        self.families.iter().flat_map(|family| family.variants.iter())
    }

    pub fn variant(&self, name: &str) -> Option<&VariantSpec> {
        self.variants().find(|variant| variant.name == name)
    }

    /// Looks up every requested variant, failing on the first unknown name.
    pub fn select(&self, names: &[String]) -> Result<Vec<&VariantSpec>> {
        if names.is_empty() {
            return Ok(self.variants().collect());
        }
        names
            .iter()
            .map(|name| {
                self.variant(name)
                    .ok_or_else(|| PrepError::UnknownVariant { name: name.clone() })
            })
            .collect()
    }

    pub fn variant_names(&self) -> Vec<&str> {
        self.variants().map(|variant| variant.name.as_str()).collect()
    }
}
