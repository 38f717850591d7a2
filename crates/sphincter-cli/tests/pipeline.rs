//! End-to-end preparation from CSV exports to JSON datasets.

use std::fs;
use std::path::Path;

use sphincter_cli::config::{ConfigOverrides, PrepareConfig, SourcePaths};
use sphincter_cli::pipeline::{VariantStatus, inspect, list_variants, prepare};
use sphincter_model::RawSource;
use sphincter_standards::StudyRegistry;

const MEASUREMENTS: &str = "\
age,mouse,vessel,treatment,pressure_d,diam_mean_before_stim,diam_max_after_stim,power_diam_h1,power_diam_h2,power_diam_h3,power_center_h1,power_center_h2,power_center_h3,diam_mean
adult,40921,pen_art,baseline,60,10,15,1.0,0.5,,2.0,,,10
adult,40921,sphincter,after_hyper,62,4,5,,,,,,,4
old,50101,bulb,hyper,70,,,1.5,0.3,0.2,1.0,0.5,,8
old,50101,cap1,baseline,65,6,6.6,2.0,1.0,0.5,1.5,0.2,0.1,5
adult,40922,cap2,after_hyper,58,3,3.3,0.4,0.1,,0.6,0.2,,3
adult,310321,pen_art,baseline,55,9,12,1,1,1,1,1,1,9
";

const BRANCHPOINTS: &str = "\
Date,Age,PA_number,Branch_number,Depth,Sphinc_diam,Bulb_diam,Firstord_diam,1.order/PA
20230201,Adult,1,1,100,3,8,5,0.5
20230201,Adult,1,2,150,4.5,,5,0.99
20230315,Old,2,1,60,2,4,4,0.3
";

const COLLATERALS: &str = "\
Date,Age,CollateralNumber,Distance,CurvedLength,Mean_diameter,SD,Craniotomy_area
20230201,Adult,1,100,120,5,1,2000000
20230201,Adult,2,80,80,4,0.5,2000000
20230315,Old,1,90,95,6,0.8,3000000
";

fn write_sources(dir: &Path) -> SourcePaths {
    let sources = SourcePaths {
        measurements: dir.join("measurements.csv"),
        branchpoints: dir.join("branchpoints.csv"),
        collaterals: dir.join("collaterals.csv"),
    };
    fs::write(&sources.measurements, MEASUREMENTS).unwrap();
    fs::write(&sources.branchpoints, BRANCHPOINTS).unwrap();
    fs::write(&sources.collaterals, COLLATERALS).unwrap();
    sources
}

fn config_in(dir: &Path) -> PrepareConfig {
    PrepareConfig {
        sources: write_sources(dir),
        output_dir: dir.join("prepared"),
        ..PrepareConfig::default()
    }
}

#[test]
fn every_variant_is_written_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = prepare(&config).unwrap();
    assert!(!result.has_errors(), "{:?}", result.variants);
    assert_eq!(result.variants.len(), 9);

    let registry = StudyRegistry::default();
    let mut written = Vec::new();
    for summary in &result.variants {
        let VariantStatus::Written { path } = &summary.status else {
            panic!("{} not written", summary.name);
        };
        assert_eq!(path, &config.output_dir.join(format!("{}.json", summary.name)));
        written.push(path.clone());
    }

    let reloaded = inspect(&written, &registry);
    assert!(reloaded.iter().all(|summary| summary.outcome.is_ok()));
    let diameter = reloaded[0].outcome.as_ref().unwrap();
    assert_eq!(diameter.name, "diameter");
    assert_eq!(diameter.rows, 4);
    assert_eq!(diameter.subjects, 3);
}

#[test]
fn missing_source_fails_only_its_variants() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    fs::remove_file(&config.sources.collaterals).unwrap();
    config.variants = vec![
        "collaterals".to_string(),
        "branchpoints".to_string(),
        "collaterals-mice".to_string(),
    ];

    let result = prepare(&config).unwrap();
    assert!(result.has_errors());
    assert_eq!(result.failed_count(), 2);
    for summary in &result.variants {
        assert_eq!(summary.is_failed(), summary.source == RawSource::Collaterals);
    }
    assert!(config.output_dir.join("branchpoints.json").is_file());
    assert!(!config.output_dir.join("collaterals.json").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_overrides(ConfigOverrides {
        variants: vec!["pulsatility-no-hyper".to_string()],
        dry_run: true,
        ..ConfigOverrides::default()
    });

    let result = prepare(&config).unwrap();
    assert_eq!(result.variants.len(), 1);
    assert_eq!(result.variants[0].status, VariantStatus::Checked);
    assert!(!config.output_dir.exists());
}

#[test]
fn unknown_variant_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.variants = vec!["q3".to_string()];

    let err = prepare(&config).unwrap_err();
    assert!(format!("{err:#}").contains("unknown variant 'q3'"));
}

#[test]
fn excluded_mice_come_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_overrides(ConfigOverrides {
        variants: vec!["diameter".to_string()],
        excluded_mice: vec!["40922".to_string()],
        dry_run: true,
        ..ConfigOverrides::default()
    });

    let result = prepare(&config).unwrap();
    // 310321 is back in, 40922 is out.
    assert_eq!(result.variants[0].rows, Some(4));
    assert_eq!(result.variants[0].subjects, Some(3));
}

#[test]
fn variant_listing_follows_configured_exclusions() {
    let config = PrepareConfig::from_toml("excluded_mice = [\"40922\", \"50101\"]\n").unwrap();
    let listings = list_variants(&config);
    assert_eq!(listings.len(), 9);

    let diameter = listings.iter().find(|l| l.name == "diameter").unwrap();
    assert_eq!(diameter.source, RawSource::Measurements);
    assert_eq!(diameter.excluded_mice, ["40922", "50101"]);
    let defaults = list_variants(&PrepareConfig::default());
    let diameter = defaults.iter().find(|l| l.name == "diameter").unwrap();
    assert_eq!(diameter.excluded_mice, ["310321"]);
}

#[test]
fn inspect_rejects_a_corrupted_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_overrides(ConfigOverrides {
        variants: vec!["branchpoints".to_string()],
        ..ConfigOverrides::default()
    });
    prepare(&config).unwrap();

    let path = config.output_dir.join("branchpoints.json");
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replacen("\"adult\"", "\"ancient\"", 1)).unwrap();

    let registry = StudyRegistry::default();
    let summaries = inspect(&[path], &registry);
    let error = summaries[0].outcome.as_ref().unwrap_err();
    // The first "adult" is a coordinate label.
    assert!(error.contains("coordinates"), "{error}");
}
