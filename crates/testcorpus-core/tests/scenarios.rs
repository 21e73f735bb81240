// crates/testcorpus-core/tests/scenarios.rs
// ============================================================================
// Module: Corpus Scenario Tests
// Description: End-to-end scenarios over temporary corpora on disk.
// Purpose: Validate read, aggregate, repartition, and patch flows together.
// ============================================================================

//! End-to-end scenarios for the corpus engine.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use testcorpus_core::Aggregator;
use testcorpus_core::CategoryKey;
use testcorpus_core::Container;
use testcorpus_core::FeatureClassifier;
use testcorpus_core::KeywordClassifier;
use testcorpus_core::LoadPolicy;
use testcorpus_core::PatternReportPatcher;
use testcorpus_core::RecordStoreReader;
use testcorpus_core::ReportPatcher;
use testcorpus_core::VariantLayout;
use testcorpus_core::VariantTag;
use testcorpus_core::interfaces::EVENT_CONTAINER_SKIPPED;
use testcorpus_core::interfaces::EVENT_NAME_COLLISION;
use testcorpus_core::partition;
use testcorpus_core::runtime::MemoryEventSink;
use testcorpus_core::runtime::NoopEventSink;
use testcorpus_core::runtime::ReaderOptions;
use testcorpus_core::runtime::plan_consolidate;
use testcorpus_core::runtime::plan_reorganize;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes a JSON document under the root, creating parents.
fn write_json(root: &Path, relative: &str, value: &Value) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, serde_json::to_vec_pretty(value).expect("encode")).expect("write");
}

/// Builds `count` records sharing a feature.
fn feature_records(prefix: &str, feature: &str, count: usize) -> Vec<Value> {
    (0 .. count)
        .map(|index| json!({"function": format!("{prefix}_{index}"), "meta": {"feature": feature}}))
        .collect()
}

/// Opens a reader with default options.
fn reader(root: &Path) -> RecordStoreReader {
    RecordStoreReader::open(root, ReaderOptions::default()).expect("reader")
}

/// Counts the records in a container file.
fn record_count(root: &Path, relative: &str) -> usize {
    let bytes = fs::read(root.join(relative)).expect("read");
    Container::from_json_bytes(relative, &bytes).expect("parse").len()
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

#[test]
fn feature_strategy_summarizes_basics_and_errors() {
    let dir = TempDir::new().expect("tempdir");
    write_json(
        dir.path(),
        "basics.json",
        &json!({"$schema": "s", "tests": feature_records("basic", "parsing", 3)}),
    );
    write_json(
        dir.path(),
        "errors.json",
        &json!({"$schema": "s", "tests": feature_records("error", "error-handling", 2)}),
    );
    let loaded = reader(dir.path()).load_all(LoadPolicy::SkipInvalid, &NoopEventSink).expect("load");
    let classifier = FeatureClassifier::with_defaults().expect("classifier");
    let summary = Aggregator::new(&classifier, &NoopEventSink).aggregate(&loaded.containers);
    assert_eq!(summary.category_total(&CategoryKey::new("core-parsing")), 3);
    assert_eq!(summary.category_total(&CategoryKey::new("output-validation")), 2);
    assert_eq!(summary.total_tests, 5);
    assert_eq!(summary.total_files, 2);
    let rendered: Value =
        serde_json::from_slice(&summary.to_json_bytes().expect("json")).expect("parse");
    assert_eq!(rendered["structure"], "feature-based");
    assert_eq!(rendered["categories"]["core-parsing"]["files"]["basics"], 3);
    assert_eq!(rendered["categories"]["type-system"]["total"], 0);
    assert_eq!(rendered["totalTests"], 5);
    assert_eq!(rendered["totalFiles"], 2);
}

#[test]
fn malformed_containers_are_skipped_during_aggregation() {
    let dir = TempDir::new().expect("tempdir");
    write_json(
        dir.path(),
        "basic-parsing.json",
        &json!({"description": "basic", "tests": feature_records("b", "parsing", 4)}),
    );
    fs::write(dir.path().join("broken.json"), b"{ not json").expect("write");
    write_json(dir.path(), "schema.json", &json!({"type": "object"}));
    write_json(dir.path(), "notes.json", &json!({"title": "no records here"}));
    let sink = MemoryEventSink::new();
    let loaded = reader(dir.path()).load_all(LoadPolicy::SkipInvalid, &sink).expect("load");
    assert_eq!(loaded.skipped.len(), 1);
    assert_eq!(sink.count(EVENT_CONTAINER_SKIPPED), 1);
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let summary = Aggregator::new(&classifier, &sink).aggregate(&loaded.containers);
    assert_eq!(summary.total_tests, 4);
    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.category_total(&CategoryKey::new("core")), 4);

    let strict = reader(dir.path()).load_all(LoadPolicy::FailFast, &NoopEventSink);
    assert!(strict.is_err());
}

#[test]
fn same_named_containers_merge_and_emit_collision() {
    let dir = TempDir::new().expect("tempdir");
    write_json(dir.path(), "a/util.json", &json!({"tests": feature_records("a", "x", 2)}));
    write_json(dir.path(), "b/util.json", &json!({"tests": feature_records("b", "x", 3)}));
    let loaded = reader(dir.path()).load_all(LoadPolicy::FailFast, &NoopEventSink).expect("load");
    let sink = MemoryEventSink::new();
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let summary = Aggregator::new(&classifier, &sink).aggregate(&loaded.containers);
    let utilities = summary.category(&CategoryKey::new("utilities")).expect("utilities");
    assert_eq!(utilities.files.get("util"), Some(&5));
    assert_eq!(summary.total_tests, 5);
    assert_eq!(sink.count(EVENT_NAME_COLLISION), 1);
}

#[test]
fn report_update_is_stable_once_applied() {
    let dir = TempDir::new().expect("tempdir");
    write_json(
        dir.path(),
        "basics.json",
        &json!({"tests": feature_records("basic", "parsing", 3)}),
    );
    let loaded = reader(dir.path()).load_all(LoadPolicy::SkipInvalid, &NoopEventSink).expect("load");
    let classifier = FeatureClassifier::with_defaults().expect("classifier");
    let summary = Aggregator::new(&classifier, &NoopEventSink).aggregate(&loaded.containers);
    let patcher = PatternReportPatcher::defaults_for(&classifier).expect("patcher");
    let report = "- **Core Parsing** (1 tests)\n";
    let outcome = patcher.patch(report, &summary).expect("patch");
    assert_eq!(outcome.text, "- **Core Parsing** (3 tests)\n");
    assert!(!patcher.patch(&outcome.text, &summary).expect("again").changed());
}

// ============================================================================
// SECTION: Variants
// ============================================================================

#[test]
fn multi_tag_record_appears_in_both_subsets() {
    let source = Container::new("core/a.json").with_records(vec![testcorpus_core::Record::new(
        json!({"function": "f", "variants": ["proposed_behavior", "reference_compliant"]}),
    )]);
    let tags = [VariantTag::new("proposed_behavior"), VariantTag::new("reference_compliant")];
    let split = partition(&source, &tags);
    assert_eq!(split.subset(&tags[0]).expect("proposed").len(), 1);
    assert_eq!(split.subset(&tags[1]).expect("reference").len(), 1);
    assert!(split.residual.is_empty());
}

#[test]
fn reorganize_then_consolidate_preserves_every_record() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write_json(
        root,
        "core/parsing.json",
        &json!({
            "$schema": "../schema.json",
            "tests": [
                {"function": "plain"},
                {"function": "p", "variants": ["proposed_behavior"]},
                {"function": "r", "variants": ["reference_compliant"]},
            ],
        }),
    );
    write_json(
        root,
        "core/typed.json",
        &json!({
            "$schema": "../schema.json",
            "tests": [{"function": "t", "variants": ["proposed_behavior"]}],
        }),
    );
    let layout = VariantLayout::default();
    let corpus = reader(root);

    let split = plan_reorganize(&corpus, &layout, &NoopEventSink).expect("plan split");
    split.commit(corpus.root(), &NoopEventSink).expect("commit split");
    assert_eq!(record_count(root, "core/parsing.json"), 1);
    assert!(!root.join("core/typed.json").exists());
    assert_eq!(record_count(root, "proposed/parsing.json"), 1);
    assert_eq!(record_count(root, "proposed/typed.json"), 1);
    assert_eq!(record_count(root, "reference/parsing.json"), 1);

    let merge = plan_consolidate(&corpus, &layout, &NoopEventSink).expect("plan merge");
    merge.commit(corpus.root(), &NoopEventSink).expect("commit merge");
    assert_eq!(record_count(root, "core/api_proposed_behavior.json"), 2);
    assert_eq!(record_count(root, "core/api_reference_compliant.json"), 1);
    assert!(!root.join("proposed").exists());
    assert!(!root.join("reference").exists());
    let merged: Value = serde_json::from_slice(
        &fs::read(root.join("core/api_proposed_behavior.json")).expect("read"),
    )
    .expect("json");
    assert_eq!(merged["$schema"], "../schema.json");
}

#[test]
fn dry_run_manifest_leaves_corpus_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write_json(
        root,
        "core/a.json",
        &json!({"tests": [{"function": "p", "variants": ["proposed_behavior"]}]}),
    );
    let before = fs::read(root.join("core/a.json")).expect("read");
    let corpus = reader(root);
    let plan = plan_reorganize(&corpus, &VariantLayout::default(), &NoopEventSink).expect("plan");
    let manifest: Value =
        serde_json::from_slice(&plan.manifest_json_bytes().expect("manifest")).expect("json");
    assert_eq!(manifest["operation"], "reorganize");
    assert_eq!(manifest["writes"][0]["path"], "proposed/a.json");
    assert_eq!(manifest["writes"][0]["records"], 1);
    assert_eq!(manifest["removals"][0]["path"], "core/a.json");
    assert_eq!(fs::read(root.join("core/a.json")).expect("read"), before);
    assert!(!root.join("proposed").exists());
}
