//! Tests for the study registry and family descriptors.

use sphincter_model::{CoordinateMode, PrepError, RowFilter};
use sphincter_standards::{StudyOptions, StudyRegistry};

#[test]
fn variant_names_are_unique_and_stable() {
    let registry = StudyRegistry::default();
    let names = registry.variant_names();
    insta::assert_json_snapshot!(names, @r#"
    [
      "diameter",
      "diameter-rel",
      "diameter-log-ratio",
      "pulsatility",
      "pulsatility-no-hyper",
      "pulsatility-raw-pressure",
      "branchpoints",
      "collaterals-mice",
      "collaterals"
    ]
    "#);
    let mut deduped = names.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len());
}

#[test]
fn every_variant_belongs_to_its_family() {
    let registry = StudyRegistry::default();
    for family in registry.families() {
        for variant in &family.variants {
            let resolved = registry.family_for(&variant.name).expect("family");
            assert_eq!(resolved.prefix, family.prefix, "{}", variant.name);
            assert_eq!(variant.output_schema().name(), family.schema.name());
        }
    }
}

#[test]
fn longest_prefix_wins() {
    let registry = StudyRegistry::default();
    assert_eq!(
        registry.family_for("collaterals-mice").expect("family").prefix,
        "collaterals-mice"
    );
    assert_eq!(
        registry.family_for("collaterals-extra").expect("family").prefix,
        "collaterals"
    );
    assert_eq!(
        registry.family_for("pulsatility-custom").expect("family").prefix,
        "pulsatility"
    );
}

#[test]
fn unknown_prefix_is_rejected() {
    let registry = StudyRegistry::default();
    for name in ["q3", "diameterx", ""] {
        let err = registry.family_for(name).expect_err("unknown");
        assert!(matches!(err, PrepError::UnknownDatasetName { .. }), "{name}");
    }
}

#[test]
fn select_reports_unknown_variants() {
    let registry = StudyRegistry::default();
    assert_eq!(registry.select(&[]).expect("all").len(), 9);
    let err = registry
        .select(&["diameter".to_string(), "nope".to_string()])
        .expect_err("unknown");
    assert!(matches!(err, PrepError::UnknownVariant { name } if name == "nope"));
}

#[test]
fn no_hyper_variant_observes_coordinates() {
    let registry = StudyRegistry::default();
    let no_hyper = registry.variant("pulsatility-no-hyper").expect("variant");
    assert_eq!(no_hyper.coordinate_mode, CoordinateMode::Observed);
    assert_eq!(no_hyper.exclusions.len(), 1);
    let base = registry.variant("pulsatility").expect("variant");
    assert_eq!(base.coordinate_mode, CoordinateMode::Declared);
}

#[test]
fn excluded_mice_come_from_options() {
    let registry = StudyRegistry::new(&StudyOptions::new().with_excluded_mice(["1", "2"]));
    let variant = registry.variant("diameter").expect("variant");
    assert!(variant.raw_filters.contains(&RowFilter::not_in("mouse", ["1", "2"])));

    let default = StudyRegistry::default();
    let variant = default.variant("pulsatility").expect("variant");
    assert!(
        variant
            .raw_filters
            .contains(&RowFilter::not_in("mouse", ["310321"]))
    );
}
