use anyhow::{Context, Result};
use comfy_table::Table;

use sphincter_cli::config::{ConfigOverrides, PrepareConfig};
use sphincter_cli::pipeline::{InspectSummary, PrepareResult, inspect, list_variants, prepare};
use sphincter_standards::StudyRegistry;

use crate::cli::{InspectArgs, PrepareArgs, VariantsArgs};
use crate::summary::apply_table_style;

pub fn run_prepare(args: &PrepareArgs) -> Result<PrepareResult> {
    let config = PrepareConfig::load(args.config.as_deref())
        .context("load configuration")?
        .with_overrides(ConfigOverrides {
            measurements: args.measurements.clone(),
            branchpoints: args.branchpoints.clone(),
            collaterals: args.collaterals.clone(),
            output_dir: args.output_dir.clone(),
            variants: args.variants.clone(),
            excluded_mice: args.exclude_mice.clone(),
            dry_run: args.dry_run,
        });
    prepare(&config)
}

pub fn run_inspect(args: &InspectArgs) -> Vec<InspectSummary> {
    let registry = StudyRegistry::default();
    inspect(&args.files, &registry)
}

pub fn run_variants(args: &VariantsArgs) -> Result<()> {
    let config = PrepareConfig::load(args.config.as_deref())
        .context("load configuration")?
        .with_overrides(ConfigOverrides {
            excluded_mice: args.exclude_mice.clone(),
            ..ConfigOverrides::default()
        });
    let mut table = Table::new();
    table.set_header(vec![
        "Variant",
        "Source",
        "Schema",
        "Coordinates",
        "Excluded mice",
    ]);
    apply_table_style(&mut table);
    for listing in list_variants(&config) {
        table.add_row(vec![
            listing.name,
            listing.source.to_string(),
            listing.schema,
            listing.dimensions.join(", "),
            if listing.excluded_mice.is_empty() {
                "-".to_string()
            } else {
                listing.excluded_mice.join(", ")
            },
        ]);
    }
    println!("{table}");
    Ok(())
}
