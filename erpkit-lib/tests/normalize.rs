use erpkit_lib::model::{RawOption, Scalar, SelectOption, normalize_options};
use serde_json::{Value, json};

// =============================================================================
// Shape recognition
// =============================================================================

#[test]
fn test_plain_string() {
    let option = SelectOption::from_json(&json!("Warehouse A")).unwrap();
    assert_eq!(option, SelectOption::new("Warehouse A", "Warehouse A"));
}

#[test]
fn test_label_value() {
    let option = SelectOption::from_json(&json!({"label": "Owner", "value": "owner"})).unwrap();
    assert_eq!(option, SelectOption::new("Owner", "owner"));
}

#[test]
fn test_value_only() {
    let option = SelectOption::from_json(&json!({"value": "kg"})).unwrap();
    assert_eq!(option, SelectOption::new("kg", "kg"));
}

#[test]
fn test_name_id() {
    let option = SelectOption::from_json(&json!({"name": "Main Store", "id": 42})).unwrap();
    assert_eq!(option, SelectOption::new("Main Store", "42"));
}

#[test]
fn test_label_value_wins_over_name_id() {
    let raw = RawOption::from_json(&json!({
        "label": "Admin", "value": "admin", "name": "ignored", "id": 1
    }))
    .unwrap();
    assert_eq!(
        raw,
        RawOption::LabelValue {
            label: Scalar::Str("Admin".into()),
            value: Scalar::Str("admin".into()),
        }
    );
}

#[test]
fn test_null_label_falls_back_to_value() {
    let option = SelectOption::from_json(&json!({"label": null, "value": 7})).unwrap();
    assert_eq!(option, SelectOption::new("7", "7"));
}

#[test]
fn test_unrecognized_shapes() {
    assert!(SelectOption::from_json(&json!({"title": "x"})).is_none());
    assert!(SelectOption::from_json(&Value::Null).is_none());
}

#[test]
fn test_every_supported_shape_is_well_formed() {
    let inputs = [
        json!("plain"),
        json!(12),
        json!({"label": "L", "value": "v"}),
        json!({"label": "", "value": "v"}),
        json!({"value": 3.5}),
        json!({"value": true}),
        json!({"name": "N", "id": "abc"}),
    ];
    for input in &inputs {
        let option = SelectOption::from_json(input)
            .unwrap_or_else(|| panic!("{input} should normalize"));
        assert!(!option.value.is_empty(), "{input} produced empty value");
        assert!(!option.label.is_empty(), "{input} produced empty label");
    }
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn test_normalize_list_preserves_order_and_dedups() {
    let rows = vec![
        json!({"name": "B", "id": 2}),
        json!({"name": "A", "id": 1}),
        json!({"name": "B again", "id": 2}),
        json!({"unknown": true}),
        json!("C"),
    ];
    let options = normalize_options(&rows);
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["B", "A", "C"]);
}
