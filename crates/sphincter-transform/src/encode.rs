//! Stable categorical encoding for index-based models.

use std::collections::BTreeMap;

use sphincter_model::{CategoryDomain, PrepError, Result};

/// Dense 1-based codes together with the levels they index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// One code per input label, in `1..=levels.len()`.
    pub codes: Vec<usize>,
    /// Observed levels in ascending domain order; code `k` is `levels[k - 1]`.
    pub levels: Vec<String>,
}

impl Encoding {
    /// Number of distinct observed levels.
    pub fn cardinality(&self) -> usize {
        self.levels.len()
    }
}

/// Encodes labels as dense codes `1..=K` in ascending domain order, where
/// `K` is the number of distinct observed labels.
///
/// The result depends only on the set of observed labels and the domain's
/// order. Missing labels and labels outside a declared domain are errors.
pub fn one_encode<S: AsRef<str>>(labels: &[Option<S>], domain: &CategoryDomain) -> Result<Encoding> {
    let mut observed = Vec::with_capacity(labels.len());
    for (row, label) in labels.iter().enumerate() {
        let Some(label) = label else {
            return Err(PrepError::MissingLabel {
                category: domain.name().to_string(),
                row,
            });
        };
        let label = label.as_ref();
        if !domain.admits(label) {
            return Err(PrepError::UnknownLabel {
                category: domain.name().to_string(),
                label: label.to_string(),
            });
        }
        observed.push(label);
    }

    let levels = domain.observed_levels(observed.iter().copied());
    let positions: BTreeMap<&str, usize> = levels
        .iter()
        .enumerate()
        .map(|(idx, level)| (level.as_str(), idx + 1))
        .collect();
    let codes = observed
        .iter()
        .map(|label| {
            positions
                .get(label)
                .copied()
                .ok_or_else(|| PrepError::UnknownLabel {
                    category: domain.name().to_string(),
                    label: (*label).to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Encoding { codes, levels })
}
