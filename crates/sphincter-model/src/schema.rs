//! Data-only schema descriptors.
//!
//! A [`Schema`] is a named, ordered list of [`ColumnSpec`] contracts. There is
//! no behaviour here beyond small accessors: the single generic validation
//! routine in `sphincter-validate` interprets these descriptors.

use std::fmt;

use serde::Serialize;

use crate::category::{CategoryDomain, OrderedCategory};

/// Semantic column type after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Text,
    Float,
    Integer,
    Boolean,
    Category(CategoryDomain),
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Category(_) => "category",
        }
    }
}

/// A row-wise numeric constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    GreaterThan { bound: f64 },
    GreaterOrEqual { bound: f64 },
    LessThan { bound: f64 },
    LessOrEqual { bound: f64 },
    /// Closed interval `[min, max]`.
    Between { min: f64, max: f64 },
}

impl Constraint {
    /// Whether a (non-missing) value satisfies the constraint.
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Self::GreaterThan { bound } => value > bound,
            Self::GreaterOrEqual { bound } => value >= bound,
            Self::LessThan { bound } => value < bound,
            Self::LessOrEqual { bound } => value <= bound,
            Self::Between { min, max } => (min..=max).contains(&value),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan { bound } => write!(f, "> {bound}"),
            Self::GreaterOrEqual { bound } => write!(f, ">= {bound}"),
            Self::LessThan { bound } => write!(f, "< {bound}"),
            Self::LessOrEqual { bound } => write!(f, "<= {bound}"),
            Self::Between { min, max } => write!(f, "in [{min}, {max}]"),
        }
    }
}

/// Contract for a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    /// No two present values may be equal.
    pub unique: bool,
    pub constraints: Vec<Constraint>,
}

impl ColumnSpec {
    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            unique: false,
            constraints: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Float)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// A category column restricted to a declared, ordered level list.
    pub fn ordered(name: impl Into<String>, category: OrderedCategory) -> Self {
        Self::new(name, ColumnType::Category(CategoryDomain::Declared(category)))
    }

    /// A category column whose levels come from the data, ordered lexically.
    pub fn lexical(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Category(CategoryDomain::Lexical))
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Strictly greater than `bound`.
    #[must_use]
    pub fn gt(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::GreaterThan { bound });
        self
    }

    #[must_use]
    pub fn ge(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::GreaterOrEqual { bound });
        self
    }

    #[must_use]
    pub fn lt(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::LessThan { bound });
        self
    }

    #[must_use]
    pub fn le(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::LessOrEqual { bound });
        self
    }

    #[must_use]
    pub fn between(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::Between { min, max });
        self
    }

    /// Category domain for category columns.
    pub fn domain(&self) -> Option<&CategoryDomain> {
        match &self.column_type {
            ColumnType::Category(domain) => Some(domain),
            _ => None,
        }
    }
}

/// A named, ordered set of column contracts.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Category domain of a column, if the column is categorical.
    pub fn domain(&self, column: &str) -> Option<&CategoryDomain> {
        self.column(column).and_then(ColumnSpec::domain)
    }
}
