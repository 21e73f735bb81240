// crates/testcorpus-core/src/core/record/tests.rs
// ============================================================================
// Module: Record and Container Unit Tests
// Description: Parsing, rendering, and header access for corpus containers.
// Purpose: Ensure container files round-trip without losing opaque fields.
// Dependencies: testcorpus-core, serde_json
// ============================================================================

//! ## Overview
//! Covers the three container layouts, strict string handling for `$schema`
//! and `description`, and the variant-tag view of a record.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use super::Container;
use super::ContainerLayout;
use super::Record;
use super::VariantTag;
use crate::CorpusError;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn suite_container_keeps_header_and_extra_fields() {
    let bytes = br#"{
        "$schema": "../schema.json",
        "description": "Basic parsing",
        "version": 2,
        "tests": [{"function": "parse", "input": "a=1"}]
    }"#;
    let container = Container::from_json_bytes("core/basics.json", bytes).expect("parse");
    assert_eq!(container.name, "basics");
    assert_eq!(container.file_name(), "basics.json");
    assert_eq!(container.layout, ContainerLayout::Suite);
    assert_eq!(container.schema.as_deref(), Some("../schema.json"));
    assert_eq!(container.description.as_deref(), Some("Basic parsing"));
    assert_eq!(container.extra.get("version"), Some(&json!(2)));
    assert_eq!(container.len(), 1);
}

#[test]
fn bare_array_is_list_layout() {
    let container =
        Container::from_json_bytes("legacy.json", br#"[{"function": "a"}, {"function": "b"}]"#)
            .expect("parse");
    assert_eq!(container.layout, ContainerLayout::List);
    assert_eq!(container.len(), 2);
    let rendered = container.to_json_bytes().expect("render");
    let value: serde_json::Value = serde_json::from_slice(&rendered).expect("json");
    assert!(value.is_array());
}

#[test]
fn object_without_tests_array_is_unrecognized() {
    let container =
        Container::from_json_bytes("odd.json", br#"{"$schema": "s", "tests": "nope"}"#)
            .expect("parse");
    assert_eq!(container.layout, ContainerLayout::Unrecognized);
    assert!(container.is_empty());
    assert_eq!(container.extra.get("tests"), Some(&json!("nope")));
}

#[test]
fn malformed_json_names_the_container() {
    let err = Container::from_json_bytes("core/broken.json", b"{ not json").unwrap_err();
    match err {
        CorpusError::Parse {
            container, ..
        } => assert_eq!(container, "core/broken.json"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_string_schema_is_a_parse_error() {
    let err = Container::from_json_bytes("a.json", br#"{"$schema": 5, "tests": []}"#).unwrap_err();
    assert!(matches!(err, CorpusError::Parse { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn rendering_orders_keys_and_ends_with_newline() {
    let container = Container::new("core/x.json")
        .with_schema("../schema.json")
        .with_description("d")
        .with_records(vec![Record::new(json!({"function": "f"}))]);
    let rendered = String::from_utf8(container.to_json_bytes().expect("render")).expect("utf8");
    assert!(rendered.ends_with("}\n"));
    let schema_at = rendered.find("$schema").expect("schema");
    let description_at = rendered.find("description").expect("description");
    let tests_at = rendered.find("tests").expect("tests");
    assert!(schema_at < description_at && description_at < tests_at);
    assert!(rendered.contains("\n  \"tests\": ["));
}

#[test]
fn records_round_trip_with_key_order() {
    let bytes = br#"{"tests": [{"zeta": 1, "alpha": {"b": 2, "a": 1}, "function": "f"}]}"#;
    let container = Container::from_json_bytes("c.json", bytes).expect("parse");
    let rendered = container.to_json_bytes().expect("render");
    let reparsed = Container::from_json_bytes("c.json", &rendered).expect("reparse");
    assert_eq!(reparsed.records, container.records);
    let text = String::from_utf8(rendered).expect("utf8");
    assert!(text.find("zeta").expect("zeta") < text.find("alpha").expect("alpha"));
}

#[test]
fn variant_tags_ignore_non_string_entries() {
    let record = Record::new(json!({"variants": ["proposed_behavior", 7, null]}));
    assert_eq!(record.variant_tags().collect::<Vec<_>>(), vec!["proposed_behavior"]);
    assert!(record.has_variant(&VariantTag::new("proposed_behavior")));
    assert!(!record.is_untagged());

    let untagged = Record::new(json!({"variants": []}));
    assert!(untagged.is_untagged());
    let missing = Record::new(json!({"function": "f"}));
    assert!(missing.is_untagged());
}

#[test]
fn meta_and_legacy_feature_accessors() {
    let record = Record::new(json!({
        "function": "parse",
        "meta": {"feature": "parsing"},
        "features": ["comments", "parsing"]
    }));
    assert_eq!(record.function(), Some("parse"));
    assert_eq!(record.meta_str("feature"), Some("parsing"));
    assert_eq!(record.meta_str("missing"), None);
    assert_eq!(record.first_listed_feature(), Some("comments"));
}

#[test]
fn derive_copies_schema_verbatim() {
    let source = Container::new("core/a.json").with_schema("s://1").with_description("desc");
    let derived = source.derive("proposed/a.json", Vec::new());
    assert_eq!(derived.schema.as_deref(), Some("s://1"));
    assert_eq!(derived.description.as_deref(), Some("desc"));
    assert_eq!(derived.name, "a");
}
