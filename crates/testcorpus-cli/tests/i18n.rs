// crates/testcorpus-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: testcorpus-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the public i18n surface used by the binary:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](testcorpus_cli::t) macro formats placeholders correctly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use testcorpus_cli::i18n::MessageArg;
use testcorpus_cli::i18n::translate;
use testcorpus_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "tests/README.md");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "tests/README.md");
}

/// Confirms unknown keys render as the key itself.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", vec![MessageArg::new("x", "1")]), "missing.key");
}

/// Confirms the macro substitutes display values.
#[test]
fn t_macro_formats_placeholders() {
    let message = t!("report.updated", path = "README.md", count = 2);
    assert_eq!(message, "Updated 2 counts in README.md.");
}

/// Confirms templates without placeholders pass through.
#[test]
fn t_macro_without_arguments() {
    assert_eq!(t!("variants.nothing_to_do"), "Nothing to move.");
}
