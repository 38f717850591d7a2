//! Declarative descriptors for one preparation variant.
//!
//! A [`VariantSpec`] says which raw source to read, how to filter and derive
//! columns, which schema to enforce, how to sort, and how to lay out the
//! coordinates and model input. One parametric builder interprets it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coords::CoordinateMode;
use crate::schema::Schema;

/// The raw tables a variant can be prepared from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSource {
    Measurements,
    Branchpoints,
    Collaterals,
}

impl RawSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Measurements => "measurements",
            Self::Branchpoints => "branchpoints",
            Self::Collaterals => "collaterals",
        }
    }
}

impl fmt::Display for RawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A header rewrite applied to every column name, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderRule {
    Lowercase,
    Replace { from: String, to: String },
}

impl HeaderRule {
    pub fn replace(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Replace {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Lowercase => name.to_lowercase(),
            Self::Replace { from, to } => name.replace(from.as_str(), to),
        }
    }
}

/// Keeps the rows that satisfy the condition.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    /// Every listed column is present (non-null, non-NaN).
    NotNull { columns: Vec<String> },
    /// The column's text form is not one of `values`.
    NotIn { column: String, values: Vec<String> },
    /// `column <= bound_column`; rows where either side is missing are dropped.
    AtMost { column: String, bound_column: String },
}

impl RowFilter {
    pub fn not_null<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NotNull {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_in<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NotIn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn at_most(column: impl Into<String>, bound_column: impl Into<String>) -> Self {
        Self::AtMost {
            column: column.into(),
            bound_column: bound_column.into(),
        }
    }
}

/// Direction of a ratio threshold flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Below,
    Above,
}

/// A computed column. Each derivation writes `target`, replacing any
/// existing column of that name, and sees the columns written before it.
///
/// Numeric results that are not finite (log of a non-positive value, a
/// division by zero) become nulls.
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// `left - right`.
    Difference { target: String, left: String, right: String },
    /// `ln(numerator / denominator)`.
    LogRatio { target: String, numerator: String, denominator: String },
    /// `(after - before) / before`.
    RelativeChange { target: String, after: String, before: String },
    /// `numerator / denominator`.
    Ratio { target: String, numerator: String, denominator: String },
    /// Row sum skipping nulls; a row with no values sums to zero.
    RowSum { target: String, columns: Vec<String> },
    /// `numerator / denominator` with a missing numerator read as zero.
    FilledRatio { target: String, numerator: String, denominator: String },
    /// `column - mean(column within group)`.
    CenterByGroup { target: String, column: String, group: String },
    Log { target: String, column: String },
    /// `ln(1 + x)`.
    Log1p { target: String, column: String },
    /// `ln(x / (1 - x))`.
    Logit { target: String, column: String },
    /// Caps the column at `max`.
    Clip { target: String, column: String, max: f64 },
    /// Boolean flag `numerator / denominator` below or above `threshold`.
    /// A missing operand compares false.
    RatioThreshold {
        target: String,
        numerator: String,
        denominator: String,
        threshold: f64,
        direction: Threshold,
    },
    Lowercase { target: String, column: String },
    /// Text form of any value (numbers without a trailing `.0`).
    ToText { target: String, column: String },
    /// Concatenated text forms of the columns.
    Concat { target: String, columns: Vec<String> },
    Copy { target: String, column: String },
}

impl Derivation {
    pub fn difference(target: &str, left: &str, right: &str) -> Self {
        Self::Difference {
            target: target.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn log_ratio(target: &str, numerator: &str, denominator: &str) -> Self {
        Self::LogRatio {
            target: target.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn relative_change(target: &str, after: &str, before: &str) -> Self {
        Self::RelativeChange {
            target: target.to_string(),
            after: after.to_string(),
            before: before.to_string(),
        }
    }

    pub fn ratio(target: &str, numerator: &str, denominator: &str) -> Self {
        Self::Ratio {
            target: target.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn row_sum(target: &str, columns: &[&str]) -> Self {
        Self::RowSum {
            target: target.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn filled_ratio(target: &str, numerator: &str, denominator: &str) -> Self {
        Self::FilledRatio {
            target: target.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn center_by_group(target: &str, column: &str, group: &str) -> Self {
        Self::CenterByGroup {
            target: target.to_string(),
            column: column.to_string(),
            group: group.to_string(),
        }
    }

    pub fn log(target: &str, column: &str) -> Self {
        Self::Log {
            target: target.to_string(),
            column: column.to_string(),
        }
    }

    pub fn log1p(target: &str, column: &str) -> Self {
        Self::Log1p {
            target: target.to_string(),
            column: column.to_string(),
        }
    }

    pub fn logit(target: &str, column: &str) -> Self {
        Self::Logit {
            target: target.to_string(),
            column: column.to_string(),
        }
    }

    /// Caps `column` at `max` in place.
    pub fn clip(column: &str, max: f64) -> Self {
        Self::Clip {
            target: column.to_string(),
            column: column.to_string(),
            max,
        }
    }

    pub fn ratio_threshold(
        target: &str,
        numerator: &str,
        denominator: &str,
        threshold: f64,
        direction: Threshold,
    ) -> Self {
        Self::RatioThreshold {
            target: target.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
            threshold,
            direction,
        }
    }

    pub fn lowercase(target: &str, column: &str) -> Self {
        Self::Lowercase {
            target: target.to_string(),
            column: column.to_string(),
        }
    }

    pub fn to_text(target: &str, column: &str) -> Self {
        Self::ToText {
            target: target.to_string(),
            column: column.to_string(),
        }
    }

    pub fn concat(target: &str, columns: &[&str]) -> Self {
        Self::Concat {
            target: target.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn copy(target: &str, column: &str) -> Self {
        Self::Copy {
            target: target.to_string(),
            column: column.to_string(),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Difference { target, .. }
            | Self::LogRatio { target, .. }
            | Self::RelativeChange { target, .. }
            | Self::Ratio { target, .. }
            | Self::RowSum { target, .. }
            | Self::FilledRatio { target, .. }
            | Self::CenterByGroup { target, .. }
            | Self::Log { target, .. }
            | Self::Log1p { target, .. }
            | Self::Logit { target, .. }
            | Self::Clip { target, .. }
            | Self::RatioThreshold { target, .. }
            | Self::Lowercase { target, .. }
            | Self::ToText { target, .. }
            | Self::Concat { target, .. }
            | Self::Copy { target, .. } => target,
        }
    }
}

/// One output column of a per-group aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateColumn {
    /// First value of `column` within the group.
    First { target: String, column: String },
    /// First value of `column` multiplied by `factor`.
    FirstScaled { target: String, column: String, factor: f64 },
    /// Number of rows in the group.
    Count { target: String },
}

impl AggregateColumn {
    pub fn target(&self) -> &str {
        match self {
            Self::First { target, .. }
            | Self::FirstScaled { target, .. }
            | Self::Count { target } => target,
        }
    }
}

/// Collapses the validated row table into one row per group, then derives
/// and validates the aggregated table against its own schema.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub group_by: String,
    pub columns: Vec<AggregateColumn>,
    pub derivations: Vec<Derivation>,
    pub schema: Arc<Schema>,
}

/// A coordinate dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionSpec {
    /// Labels of a categorical column, published under `name`.
    Column { name: String, column: String },
    /// Fixed labels, for the rows of stacked arrays.
    Constant { name: String, labels: Vec<String> },
    /// `"0".."N-1"` in table order.
    Observation { name: String },
}

impl DimensionSpec {
    pub fn column(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            column: column.into(),
        }
    }

    pub fn constant<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Constant {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn observation() -> Self {
        Self::Observation {
            name: "observation".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Column { name, .. } | Self::Constant { name, .. } | Self::Observation { name } => {
                name
            }
        }
    }
}

/// Which columns feed the response field `y`.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeSpec {
    Single(String),
    Stacked(Vec<String>),
}

/// Rows whose `column` holds one of `labels` get `hyper = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub column: String,
    pub labels: Vec<String>,
}

/// Maps validated columns to model-input fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInputLayout {
    pub subject: String,
    pub age: String,
    pub treatment: Option<String>,
    pub vessel_type: Option<String>,
    pub outcome: Option<OutcomeSpec>,
    pub hyper: Option<IndicatorSpec>,
    pub pressure: Option<String>,
    pub diameter: Option<String>,
    /// Columns of the covariate matrix `x`, in order. Empty means no `x`.
    pub covariates: Vec<String>,
}

impl ModelInputLayout {
    pub fn new(subject: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            age: age.into(),
            treatment: None,
            vessel_type: None,
            outcome: None,
            hyper: None,
            pressure: None,
            diameter: None,
            covariates: Vec::new(),
        }
    }
}

/// Everything needed to turn one raw table into one validated dataset.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    pub name: String,
    pub source: RawSource,
    pub header: Vec<HeaderRule>,
    pub raw_filters: Vec<RowFilter>,
    /// `(from, to)` column renames.
    pub renames: Vec<(String, String)>,
    pub derivations: Vec<Derivation>,
    pub derived_filters: Vec<RowFilter>,
    pub schema: Arc<Schema>,
    /// Row filters applied to the validated table.
    pub exclusions: Vec<RowFilter>,
    pub aggregation: Option<Aggregation>,
    pub sort_keys: Vec<String>,
    pub dimensions: Vec<DimensionSpec>,
    pub coordinate_mode: CoordinateMode,
    pub layout: ModelInputLayout,
}

impl VariantSpec {
    pub fn new(
        name: impl Into<String>,
        source: RawSource,
        schema: Arc<Schema>,
        layout: ModelInputLayout,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            header: Vec::new(),
            raw_filters: Vec::new(),
            renames: Vec::new(),
            derivations: Vec::new(),
            derived_filters: Vec::new(),
            schema,
            exclusions: Vec::new(),
            aggregation: None,
            sort_keys: Vec::new(),
            dimensions: Vec::new(),
            coordinate_mode: CoordinateMode::default(),
            layout,
        }
    }

    /// The schema the emitted measurements conform to.
    pub fn output_schema(&self) -> &Arc<Schema> {
        self.aggregation
            .as_ref()
            .map_or(&self.schema, |aggregation| &aggregation.schema)
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn header_rule(mut self, rule: HeaderRule) -> Self {
        self.header.push(rule);
        self
    }

    #[must_use]
    pub fn raw_filter(mut self, filter: RowFilter) -> Self {
        self.raw_filters.push(filter);
        self
    }

    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }

    #[must_use]
    pub fn derive(mut self, derivation: Derivation) -> Self {
        self.derivations.push(derivation);
        self
    }

    #[must_use]
    pub fn derived_filter(mut self, filter: RowFilter) -> Self {
        self.derived_filters.push(filter);
        self
    }

    #[must_use]
    pub fn exclude(mut self, filter: RowFilter) -> Self {
        self.exclusions.push(filter);
        self
    }

    #[must_use]
    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    #[must_use]
    pub fn sort_by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn dimension(mut self, dimension: DimensionSpec) -> Self {
        self.dimensions.push(dimension);
        self
    }

    #[must_use]
    pub fn coordinate_mode(mut self, mode: CoordinateMode) -> Self {
        self.coordinate_mode = mode;
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: ModelInputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Subjects dropped by every `NotIn` raw filter on `column`.
    pub fn excluded_values(&self, column: &str) -> Vec<&str> {
        self.raw_filters
            .iter()
            .filter_map(|filter| match filter {
                RowFilter::NotIn { column: c, values } if c == column => Some(values),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_rules_apply_in_sequence() {
        let rules = [
            HeaderRule::Lowercase,
            HeaderRule::replace("/", "_per_"),
            HeaderRule::replace(" ", ""),
        ];
        let name = rules
            .iter()
            .fold("FirstOrder / PA".to_string(), |acc, rule| rule.apply(&acc));
        assert_eq!(name, "firstorder_per_pa");
    }

    #[test]
    fn output_schema_prefers_aggregation() {
        let rows = Arc::new(Schema::new("rows", Vec::new()));
        let groups = Arc::new(Schema::new("groups", Vec::new()));
        let spec = VariantSpec::new(
            "demo",
            RawSource::Collaterals,
            rows,
            ModelInputLayout::new("mouse_id", "age"),
        );
        assert_eq!(spec.output_schema().name(), "rows");
        let spec = spec.aggregate(Aggregation {
            group_by: "mouse_id".to_string(),
            columns: vec![AggregateColumn::Count {
                target: "n".to_string(),
            }],
            derivations: Vec::new(),
            schema: groups,
        });
        assert_eq!(spec.output_schema().name(), "groups");
    }

    #[test]
    fn excluded_values_collects_not_in_filters() {
        let spec = VariantSpec::new(
            "demo",
            RawSource::Measurements,
            Arc::new(Schema::new("rows", Vec::new())),
            ModelInputLayout::new("mouse", "age"),
        )
        .raw_filter(RowFilter::not_null(["x"]))
        .raw_filter(RowFilter::not_in("mouse", ["310321"]));
        assert_eq!(spec.excluded_values("mouse"), vec!["310321"]);
        assert!(spec.excluded_values("age").is_empty());
    }
}
