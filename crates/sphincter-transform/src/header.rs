//! Column header normalisation and renames.

use polars::prelude::DataFrame;
use sphincter_model::{HeaderRule, Result};

/// Rewrites every column name through `rules`, in order.
pub fn normalize_headers(df: &DataFrame, rules: &[HeaderRule]) -> Result<DataFrame> {
    if rules.is_empty() {
        return Ok(df.clone());
    }
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| {
            rules
                .iter()
                .fold(column.name().to_string(), |name, rule| rule.apply(&name))
        })
        .collect();
    let mut out = df.clone();
    out.set_column_names(names)?;
    Ok(out)
}

/// Applies `(from, to)` renames. Renames of absent columns are skipped.
pub fn apply_renames(df: &DataFrame, renames: &[(String, String)]) -> Result<DataFrame> {
    let mut out = df.clone();
    for (from, to) in renames {
        if out.column(from).is_ok() {
            out.rename(from, to.as_str().into())?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;
    use sphincter_common::column_names;

    #[test]
    fn rules_rewrite_headers() {
        let df = DataFrame::new(vec![
            Column::new("Sphinc_diam".into(), &[1.0]),
            Column::new("1.ord/PA".into(), &[0.5]),
        ])
        .unwrap();
        let rules = [
            HeaderRule::Lowercase,
            HeaderRule::replace("1.", "first"),
            HeaderRule::replace("sphinc_diam", "sphincter_diameter"),
            HeaderRule::replace("/", "_per_"),
        ];
        let out = normalize_headers(&df, &rules).unwrap();
        assert_eq!(column_names(&out), ["sphincter_diameter", "firstord_per_pa"]);
    }

    #[test]
    fn missing_rename_sources_are_ignored() {
        let df = DataFrame::new(vec![Column::new("vessel".into(), &["bulb"])]).unwrap();
        let renames = [
            ("vessel".to_string(), "vessel_type".to_string()),
            ("diam_mean".to_string(), "diameter".to_string()),
        ];
        let out = apply_renames(&df, &renames).unwrap();
        assert_eq!(column_names(&out), ["vessel_type"]);
    }
}
