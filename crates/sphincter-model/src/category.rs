//! Ordered categories and category domains.
//!
//! An [`OrderedCategory`] is a finite, explicitly ordered list of labels
//! (e.g. age: `adult < old`). The order belongs to the schema that declares
//! it and drives both the deterministic sort and the integer codes handed to
//! index-based models.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named, explicitly ordered set of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedCategory {
    name: String,
    levels: Vec<String>,
}

impl OrderedCategory {
    /// Create a category from its name and levels in ascending order.
    ///
    /// Repeated labels keep their first position.
    pub fn new<I, S>(name: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let levels = levels
            .into_iter()
            .map(Into::into)
            .filter(|level: &String| seen.insert(level.clone()))
            .collect();
        Self {
            name: name.into(),
            levels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Levels in ascending order.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Zero-based position of a label, if declared.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.levels.iter().position(|level| level == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Declared levels restricted to those present in `observed`, in declared order.
    pub fn restrict_to<'a, I>(&self, observed: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: BTreeSet<&str> = observed.into_iter().collect();
        self.levels
            .iter()
            .filter(|level| present.contains(level.as_str()))
            .cloned()
            .collect()
    }
}

/// The set of labels a category column accepts, and how they are ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDomain {
    /// A fixed, declared level list. Labels outside it are violations.
    Declared(OrderedCategory),
    /// Any label is accepted; labels order by byte-wise string comparison.
    /// Used for subject identifiers, whose domain is only known from data.
    Lexical,
}

impl CategoryDomain {
    /// Whether a label belongs to the domain.
    pub fn admits(&self, label: &str) -> bool {
        match self {
            Self::Declared(category) => category.contains(label),
            Self::Lexical => true,
        }
    }

    /// Compare two labels in domain order. Undeclared labels sort last.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        match self {
            Self::Declared(category) => {
                let l = category.position(left).unwrap_or(usize::MAX);
                let r = category.position(right).unwrap_or(usize::MAX);
                l.cmp(&r).then_with(|| left.cmp(right))
            }
            Self::Lexical => left.cmp(right),
        }
    }

    /// Distinct observed labels in ascending domain order.
    ///
    /// Undeclared labels are dropped for declared domains.
    pub fn observed_levels<'a, I>(&self, observed: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            Self::Declared(category) => category.restrict_to(observed),
            Self::Lexical => observed
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Category name, or `lexical` for data-defined domains.
    pub fn name(&self) -> &str {
        match self {
            Self::Declared(category) => category.name(),
            Self::Lexical => "lexical",
        }
    }

    /// The declared level list, if any.
    pub fn declared(&self) -> Option<&OrderedCategory> {
        match self {
            Self::Declared(category) => Some(category),
            Self::Lexical => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vessel_types() -> OrderedCategory {
        OrderedCategory::new("vessel_type", ["pen_art", "sphincter", "bulb", "cap1", "cap2"])
    }

    #[test]
    fn positions_follow_declaration_order() {
        let category = vessel_types();
        assert_eq!(category.position("pen_art"), Some(0));
        assert_eq!(category.position("cap2"), Some(4));
        assert_eq!(category.position("cap9"), None);
    }

    #[test]
    fn restrict_keeps_declared_order() {
        let category = vessel_types();
        let observed = ["cap1", "pen_art", "cap1", "bulb"];
        assert_eq!(category.restrict_to(observed), vec!["pen_art", "bulb", "cap1"]);
    }

    #[test]
    fn duplicate_levels_are_collapsed() {
        let category = OrderedCategory::new("age", ["adult", "old", "adult"]);
        assert_eq!(category.levels(), &["adult".to_string(), "old".to_string()]);
    }

    #[test]
    fn lexical_domain_orders_by_text() {
        let domain = CategoryDomain::Lexical;
        assert!(domain.admits("anything"));
        assert_eq!(domain.compare("310321", "40921"), Ordering::Less);
        assert_eq!(domain.observed_levels(["b", "a", "b"]), vec!["a", "b"]);
    }

    #[test]
    fn declared_domain_rejects_unknown_labels() {
        let domain = CategoryDomain::Declared(OrderedCategory::new("age", ["adult", "old"]));
        assert!(domain.admits("old"));
        assert!(!domain.admits("young"));
        assert_eq!(domain.compare("old", "adult"), Ordering::Greater);
    }
}
