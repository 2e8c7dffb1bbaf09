//! Integration tests for payload mapping.
//!
//! These tests verify that:
//! - Output nesting is controlled only by the notation the caller used
//! - Sibling nodes resolve independently of each other's notation
//! - Dynamic values always beat static overrides
//! - Defaults fill in only for optional parameters

use schematic_engine::prelude::*;
use serde_json::{Map, Value, json};

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("arguments must be an object")
}

fn product_search() -> Payload {
    Payload::builder()
        .parameter(
            "price",
            NestedParameter::new("price")
                .child("min", Parameter::new("price.gte").with_type(ParamType::Float))
                .child("max", Parameter::new("price.lte").with_type(ParamType::Float)),
        )
        .parameter("category", Parameter::new("cat"))
        .parameter("page", Parameter::new("page").with_default(1))
        .static_value("format", "json")
        .build()
}

// =============================================================================
// Notation parity
// =============================================================================

#[test]
fn nested_and_dotted_inputs_yield_same_leaf_values() {
    let payload = product_search();

    let nested = payload
        .map(&args(json!({"price": {"min": 10, "max": 100}})))
        .unwrap();
    let dotted = payload
        .map(&args(json!({"price.min": 10, "price.max": 100})))
        .unwrap();

    assert_eq!(
        nested["price"],
        json!({"price.gte": 10, "price.lte": 100}),
        "nested input should nest output"
    );
    assert_eq!(dotted["price.gte"], json!(10));
    assert_eq!(dotted["price.lte"], json!(100));
    assert!(dotted.get("price").is_none(), "dotted input should stay flat");
}

#[test]
fn mixed_notation_across_siblings_is_independent() {
    let payload = Payload::builder()
        .parameter(
            "price",
            NestedParameter::new("price")
                .child("min", Parameter::new("price.gte"))
                .child("max", Parameter::new("price.lte")),
        )
        .parameter("category", Parameter::new("cat"))
        .build();

    let out = payload
        .map(&args(json!({"price.min": 10, "category": "shoes"})))
        .unwrap();
    assert_eq!(Value::Object(out), json!({"price.gte": 10, "cat": "shoes"}));
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn dynamic_value_beats_static_value() {
    let payload = Payload::builder()
        .static_value("q", "static_value")
        .parameter("query", Parameter::new("q"))
        .build();

    let out = payload.map(&args(json!({"query": "dynamic_value"}))).unwrap();
    assert_eq!(out["q"], json!("dynamic_value"));
}

#[test]
fn dynamic_branch_beats_static_value() {
    let payload = Payload::builder()
        .static_value("price.gte", 0)
        .parameter(
            "price",
            NestedParameter::new("price").child("min", Parameter::new("price.gte")),
        )
        .build();

    let out = payload.map(&args(json!({"price.min": 5}))).unwrap();
    assert_eq!(out["price.gte"], json!(5));
}

#[test]
fn default_applies_and_is_overridable() {
    let payload = product_search();

    let defaulted = payload.map(&Map::new()).unwrap();
    assert_eq!(defaulted["page"], json!(1));
    assert_eq!(defaulted["format"], json!("json"));

    let supplied = payload.map(&args(json!({"page": 4}))).unwrap();
    assert_eq!(supplied["page"], json!(4));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn constraint_failure_fails_whole_call() {
    let payload = product_search();
    let err = payload
        .map(&args(json!({"price.min": "cheap", "category": "shoes"})))
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::constraint("price.min", "expected float, got string")
    );
}

#[test]
fn required_nested_child_missing_under_both_notations() {
    let payload = Payload::builder()
        .parameter(
            "range",
            NestedParameter::new("range")
                .child("from", Parameter::new("from").required())
                .child("to", Parameter::new("to")),
        )
        .build();

    assert!(payload.validate(&args(json!({"range.from": 1}))));
    assert!(payload.validate(&args(json!({"range": {"from": 1}}))));

    let err = payload.map(&args(json!({"range": {"to": 2}}))).unwrap_err();
    assert!(err.is_missing_required());
    assert_eq!(err.path(), Some("range.from"));
}

#[test]
fn unknown_dotted_keys_are_dropped() {
    let payload = product_search();
    let input = args(json!({"price.median": 50, "category": "hats"}));

    let out = payload.map(&input).unwrap();
    assert!(out.get("price.median").is_none());
    assert_eq!(payload.unmatched(&input), vec!["price.median"]);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn payload_maps_concurrently() {
    let payload = std::sync::Arc::new(product_search());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let payload = std::sync::Arc::clone(&payload);
            std::thread::spawn(move || {
                let out = payload
                    .map(&args(json!({"category": format!("c{i}")})))
                    .unwrap();
                out["cat"].clone()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), json!(format!("c{i}")));
    }
}
