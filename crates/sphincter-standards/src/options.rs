//! Study-wide preparation options.

use serde::{Deserialize, Serialize};

/// Subjects dropped from the measurement families unless overridden.
pub const DEFAULT_EXCLUDED_MICE: &[&str] = &["310321"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyOptions {
    /// Raw subject identifiers removed before any derivation.
    pub excluded_mice: Vec<String>,
}

impl Default for StudyOptions {
    fn default() -> Self {
        Self {
            excluded_mice: DEFAULT_EXCLUDED_MICE.iter().map(ToString::to_string).collect(),
        }
    }
}

impl StudyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excluded_mice<I, S>(mut self, mice: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_mice = mice.into_iter().map(Into::into).collect();
        self
    }
}
