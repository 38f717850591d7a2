//! Coordinate index construction.

use polars::prelude::DataFrame;
use sphincter_common::text_column;
use sphincter_model::{
    CategoryDomain, CoordinateIndex, CoordinateMode, DimensionSpec, PrepError, Result, Schema,
};

/// Builds the label list of every dimension.
///
/// Declared categories list every declared level in `Declared` mode and only
/// the observed ones in `Observed` mode. Lexical and text columns always list
/// the distinct observed labels.
///
/// Model-input codes are always dense over the observed labels, so in
/// `Declared` mode a dimension may list more labels than its `N_<dim>`:
/// with treatments `baseline < after_hyper < after_ablation` and no
/// `after_hyper` rows, the coordinates keep all three labels while the
/// treatment codes are `1` (baseline) and `2` (after_ablation). Consumers
/// that index coordinates by code should use `Observed` mode.
pub fn build_coordinates(
    df: &DataFrame,
    schema: &Schema,
    dimensions: &[DimensionSpec],
    mode: CoordinateMode,
) -> Result<CoordinateIndex> {
    let mut index = CoordinateIndex::new();
    for dimension in dimensions {
        let labels = match dimension {
            DimensionSpec::Column { column, .. } => {
                let values = text_column(df, column).map_err(|_| PrepError::column_not_found(column))?;
                let observed = values.iter().flatten().map(String::as_str);
                match (schema.domain(column), mode) {
                    (Some(CategoryDomain::Declared(category)), CoordinateMode::Declared) => {
                        category.levels().to_vec()
                    }
                    (Some(domain), _) => domain.observed_levels(observed),
                    (None, _) => CategoryDomain::Lexical.observed_levels(observed),
                }
            }
            DimensionSpec::Constant { labels, .. } => labels.clone(),
            DimensionSpec::Observation { .. } => (0..df.height()).map(|row| row.to_string()).collect(),
        };
        index.insert(dimension.name(), labels);
    }
    Ok(index)
}
