// crates/testcorpus-core/src/runtime/patch/tests.rs
// ============================================================================
// Module: Pattern Report Patcher Unit Tests
// Description: Rule compilation and report text patching.
// Purpose: Ensure only the captured numbers change and stale text is reported.
// Dependencies: testcorpus-core
// ============================================================================

//! ## Overview
//! Exercises default keyword and feature rules, first-match-only replacement,
//! unmatched reporting, and rule validation.

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::PatchRule;
use super::PatternReportPatcher;
use crate::core::CategoryKey;
use crate::core::Summary;
use crate::interfaces::Classifier;
use crate::interfaces::PatchField;
use crate::interfaces::ReportPatcher;
use crate::runtime::classify::FeatureClassifier;
use crate::runtime::classify::KeywordClassifier;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a keyword summary with fixed tallies.
fn keyword_summary(classifier: &KeywordClassifier) -> Summary {
    let mut summary = Summary::new(classifier.structure(), classifier.categories());
    summary.add_container(&CategoryKey::new("core"), "basic.json", 12);
    summary.add_container(&CategoryKey::new("features"), "dotted.json", 5);
    summary.add_container(&CategoryKey::new("utilities"), "pretty.json", 3);
    summary
}

/// Sample keyword report.
const KEYWORD_REPORT: &str = "\
The suite includes **10 test cases** total:

### Core (9 tests)
### Features (5 tests)
### Integration (4 tests)
### Utilities (3 tests)
";

// ============================================================================
// SECTION: Keyword Reports
// ============================================================================

#[test]
fn keyword_defaults_rewrite_stale_numbers() {
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let patcher = PatternReportPatcher::defaults_for(&classifier).expect("patcher");
    let outcome = patcher.patch(KEYWORD_REPORT, &keyword_summary(&classifier)).expect("patch");
    assert!(outcome.changed());
    assert!(outcome.text.contains("includes **20 test cases** total:"));
    assert!(outcome.text.contains("### Core (12 tests)"));
    assert!(outcome.text.contains("### Features (5 tests)"));
    assert!(outcome.text.contains("### Integration (0 tests)"));
    let fields: Vec<String> = outcome.changes.iter().map(|change| change.field.to_string()).collect();
    assert_eq!(fields, vec!["total_tests", "category:core", "category:integration"]);
    assert_eq!(outcome.changes[0].previous, "10");
    assert_eq!(outcome.changes[0].current, 20);
    assert!(outcome.unmatched.is_empty());
}

#[test]
fn patching_is_idempotent() {
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let patcher = PatternReportPatcher::defaults_for(&classifier).expect("patcher");
    let summary = keyword_summary(&classifier);
    let first = patcher.patch(KEYWORD_REPORT, &summary).expect("first");
    let second = patcher.patch(&first.text, &summary).expect("second");
    assert!(!second.changed());
    assert_eq!(second.text, first.text);
}

#[test]
fn missing_sections_are_reported_without_editing() {
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let patcher = PatternReportPatcher::defaults_for(&classifier).expect("patcher");
    let text = "### Core (12 tests)\n";
    let outcome = patcher.patch(text, &keyword_summary(&classifier)).expect("patch");
    assert!(!outcome.changed());
    assert_eq!(outcome.text, text);
    assert_eq!(outcome.unmatched.len(), 4);
    assert_eq!(outcome.unmatched[0], PatchField::TotalTests);
}

#[test]
fn only_the_first_match_is_replaced() {
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let rules = vec![
        PatchRule::new(PatchField::Category(CategoryKey::new("core")), r"### Core \((\d+) tests\)")
            .expect("rule"),
    ];
    let patcher = PatternReportPatcher::new(rules, classifier.categories()).expect("patcher");
    let text = "### Core (1 tests)\n### Core (1 tests)\n";
    let outcome = patcher.patch(text, &keyword_summary(&classifier)).expect("patch");
    assert_eq!(outcome.text, "### Core (12 tests)\n### Core (1 tests)\n");
}

// ============================================================================
// SECTION: Feature Reports
// ============================================================================

#[test]
fn feature_defaults_escape_labels() {
    let classifier = FeatureClassifier::with_defaults().expect("classifier");
    let patcher = PatternReportPatcher::defaults_for(&classifier).expect("patcher");
    assert_eq!(patcher.rules().len(), 5);
    let mut summary = Summary::new(classifier.structure(), classifier.categories());
    summary.add_container(&CategoryKey::new("output-validation"), "errors.json", 7);
    let text = "- **Output & Validation** (2 tests)\n- **Type System** (0 tests)\n";
    let outcome = patcher.patch(text, &summary).expect("patch");
    assert_eq!(outcome.text, "- **Output & Validation** (7 tests)\n- **Type System** (0 tests)\n");
    assert_eq!(outcome.changes.len(), 1);
    assert_eq!(outcome.unmatched.len(), 3);
}

// ============================================================================
// SECTION: Rule Validation
// ============================================================================

#[test]
fn rules_need_exactly_one_capture_group() {
    assert!(PatchRule::new(PatchField::TotalTests, r"total \d+").is_err());
    assert!(PatchRule::new(PatchField::TotalTests, r"(\d+) of (\d+)").is_err());
    assert!(PatchRule::new(PatchField::TotalTests, r"(\d+").is_err());
    assert!(PatchRule::new(PatchField::TotalTests, r"total (\d+)").is_ok());
}

#[test]
fn unknown_category_rule_is_rejected() {
    let classifier = KeywordClassifier::with_defaults().expect("classifier");
    let rules = vec![
        PatchRule::new(PatchField::Category(CategoryKey::new("missing")), r"(\d+)").expect("rule"),
    ];
    assert!(PatternReportPatcher::new(rules, classifier.categories()).is_err());
}
