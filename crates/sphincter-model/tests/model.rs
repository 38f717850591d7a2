//! Tests for the model-input record and coordinate index wire shapes.

use serde_json::json;
use sphincter_model::{CoordinateIndex, ModelInput, Outcome, PrepError, SchemaError, SchemaViolation};

fn base_input() -> ModelInput {
    ModelInput {
        n: 2,
        n_age: 1,
        n_mouse: 1,
        n_treatment: Some(1),
        n_vessel_type: Some(2),
        n_train: 2,
        n_test: 2,
        age: vec![1, 1],
        mouse_age: vec![1],
        mouse: vec![1, 1],
        treatment: Some(vec![1, 1]),
        vessel_type: Some(vec![1, 2]),
        ix_train: vec![1, 2],
        ix_test: vec![1, 2],
        y: None,
        hyper: None,
        pressure: None,
        diameter: None,
        k: None,
        x: None,
    }
}

#[test]
fn model_input_uses_model_field_names() {
    let value = serde_json::to_value(base_input()).expect("serialize");
    let object = value.as_object().expect("object");
    for key in ["N", "N_age", "N_mouse", "N_treatment", "N_vessel_type", "N_train", "N_test"] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert!(!object.contains_key("y"));
    assert!(!object.contains_key("K"));
}

#[test]
fn stacked_outcome_round_trips() {
    let mut input = base_input();
    input.y = Some(Outcome::Stacked(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
    let text = serde_json::to_string(&input).expect("serialize");
    let back: ModelInput = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, input);
    assert_eq!(back.y.map(|y| y.rows()), Some(2));
}

#[test]
fn single_outcome_is_a_flat_array() {
    let mut input = base_input();
    input.y = Some(Outcome::Single(vec![0.5, 0.25]));
    let value = serde_json::to_value(&input).expect("serialize");
    assert_eq!(value["y"], json!([0.5, 0.25]));
}

#[test]
fn unknown_model_input_fields_are_rejected() {
    let mut value = serde_json::to_value(base_input()).expect("serialize");
    value["bogus"] = json!(1);
    assert!(serde_json::from_value::<ModelInput>(value).is_err());
}

#[test]
fn coordinate_index_serializes_as_a_map() {
    let mut coords = CoordinateIndex::new();
    coords.insert("age", vec!["adult".to_string(), "old".to_string()]);
    coords.insert("observation", vec!["0".to_string()]);
    let value = serde_json::to_value(&coords).expect("serialize");
    assert_eq!(value, json!({"age": ["adult", "old"], "observation": ["0"]}));
    assert_eq!(coords.get("age").map(<[String]>::len), Some(2));
}

#[test]
fn schema_error_is_surfaced_through_prep_error() {
    let err: PrepError =
        SchemaError::new("diameter", vec![SchemaViolation::missing_column("age")]).into();
    let schema_error = err.schema_error().expect("schema error");
    assert_eq!(schema_error.for_column("age").count(), 1);
    assert!(err.to_string().contains("age: missing column"));
}
