//! Schema violations collected by validation.

use std::fmt;

use serde::Serialize;

use crate::schema::Constraint;

/// Why a single cell or column failed its contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationReason {
    MissingColumn,
    Uncoercible { value: String, expected: String },
    UnexpectedNull,
    NonFinite { value: String },
    ConstraintFailed { constraint: Constraint, value: f64 },
    OutOfDomain { value: String },
    Duplicate { value: String, first_row: usize },
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn => f.write_str("missing column"),
            Self::Uncoercible { value, expected } => {
                write!(f, "uncoercible value '{value}' (expected {expected})")
            }
            Self::UnexpectedNull => f.write_str("unexpected null"),
            Self::NonFinite { value } => write!(f, "non-finite value {value}"),
            Self::ConstraintFailed { constraint, value } => {
                write!(f, "constraint failed: {value} is not {constraint}")
            }
            Self::OutOfDomain { value } => write!(f, "out of domain value '{value}'"),
            Self::Duplicate { value, first_row } => {
                write!(f, "duplicate value '{value}' (first seen at row {first_row})")
            }
        }
    }
}

/// One violation, located by column and (for cell-level failures) row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaViolation {
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(flatten)]
    pub reason: ViolationReason,
}

impl SchemaViolation {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row: None,
            reason: ViolationReason::MissingColumn,
        }
    }

    pub fn at(column: impl Into<String>, row: usize, reason: ViolationReason) -> Self {
        Self {
            column: column.into(),
            row: Some(row),
            reason,
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{} row {}: {}", self.column, row, self.reason),
            None => write!(f, "{}: {}", self.column, self.reason),
        }
    }
}

/// All violations found while validating one table against one schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "schema '{schema}' rejected the table with {} violation(s): {}",
    .violations.len(),
    summarize(.violations)
)]
pub struct SchemaError {
    pub schema: String,
    pub violations: Vec<SchemaViolation>,
}

impl SchemaError {
    pub fn new(schema: impl Into<String>, violations: Vec<SchemaViolation>) -> Self {
        Self {
            schema: schema.into(),
            violations,
        }
    }

    /// Violations reported against a given column.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a SchemaViolation> {
        self.violations.iter().filter(move |v| v.column == column)
    }
}

const SUMMARY_LIMIT: usize = 5;

fn summarize(violations: &[SchemaViolation]) -> String {
    let mut parts: Vec<String> = violations
        .iter()
        .take(SUMMARY_LIMIT)
        .map(ToString::to_string)
        .collect();
    if violations.len() > SUMMARY_LIMIT {
        parts.push(format!("and {} more", violations.len() - SUMMARY_LIMIT));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location() {
        let v = SchemaViolation::at("pd1", 3, ViolationReason::UnexpectedNull);
        assert_eq!(v.to_string(), "pd1 row 3: unexpected null");
        let v = SchemaViolation::missing_column("age");
        assert_eq!(v.to_string(), "age: missing column");
    }

    #[test]
    fn error_message_is_truncated() {
        let violations = (0..7)
            .map(|row| SchemaViolation::at("x", row, ViolationReason::UnexpectedNull))
            .collect();
        let err = SchemaError::new("demo", violations);
        let message = err.to_string();
        assert!(message.contains("7 violation(s)"));
        assert!(message.ends_with("and 2 more"));
    }
}
