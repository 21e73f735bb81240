// crates/testcorpus-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for test corpus configuration. The active values are
//! the built-in defaults; commented tables show how to replace them.

/// Returns a canonical example `testcorpus.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[corpus]
root = "tests/suites"
extension = "json"
exclude_suffixes = ["schema.json"]
max_container_bytes = 8388608

[classifier]
# "keyword" matches file names and descriptions; "feature" reads meta.<feature_field>.
strategy = "keyword"
feature_field = "feature"

# [classifier.keyword]
# categories = [
#   { key = "core", label = "Core" },
#   { key = "integration", label = "Integration" },
# ]
# rules = [
#   { category = "core", keywords = ["core", "basic"] },
#   { category = "integration", keywords = ["e2e", "workflow"] },
# ]

# [classifier.feature]
# categories = [{ key = "core-parsing", label = "Core Parsing" }]
# mappings = [{ feature = "parsing", category = "core-parsing" }]

[variants]
root = "tests/variants"
source_dir = "core"
remove_empty_sources = true
# default_schema = "../schema.json"

[[variants.tags]]
name = "proposed_behavior"
dir = "proposed"
consolidated_file = "api_proposed_behavior.json"

[[variants.tags]]
name = "reference_compliant"
dir = "reference"

[report]
path = "tests/README.md"
# Leave rules empty to use the defaults for the active strategy.
# [[report.rules]]
# field = "total_tests"
# pattern = 'includes \*\*(\d+) test cases\*\* total:'
"#,
    )
}
