// crates/testcorpus-core/src/runtime/classify.rs
// ============================================================================
// Module: Container Classifiers
// Description: Keyword-match and metadata-field classification strategies.
// Purpose: Map containers to reporting categories deterministically.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Two interchangeable [`Classifier`] implementations:
//!
//! - [`KeywordClassifier`] searches `"<file name> <description>"`, lower-cased,
//!   against an ordered keyword table; the first category with any matching
//!   keyword wins.
//! - [`FeatureClassifier`] reads one `meta` field of the first record and
//!   looks it up in a `feature -> category` table.
//!
//! Both fall back to `other` and never inspect record payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::CorpusError;
use crate::core::CategoryDefinition;
use crate::core::CategoryKey;
use crate::core::CategorySet;
use crate::core::Container;
use crate::core::ContainerLayout;
use crate::interfaces::Classifier;

// ============================================================================
// SECTION: Structure Tags
// ============================================================================

/// Structure tag reported by the keyword strategy.
pub const KEYWORD_STRUCTURE: &str = "flat";

/// Structure tag reported by the metadata-field strategy.
pub const FEATURE_STRUCTURE: &str = "feature-based";

/// Default `meta` field read by the metadata-field strategy.
pub const DEFAULT_FEATURE_FIELD: &str = "feature";

// ============================================================================
// SECTION: Keyword Strategy
// ============================================================================

/// One row of the keyword table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    /// Category assigned on match.
    pub category: CategoryKey,
    /// Lower-case substrings that select the category.
    pub keywords: Vec<String>,
}

impl KeywordRule {
    /// Creates a keyword rule; keywords are lower-cased.
    #[must_use]
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: CategoryKey::new(category),
            keywords: keywords.iter().map(|keyword| keyword.to_lowercase()).collect(),
        }
    }
}

/// First-match keyword classifier.
///
/// # Invariants
/// - Rule order is significant; earlier rules win.
/// - Every rule category is declared in the category set.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    /// Declared categories.
    categories: CategorySet,
    /// Ordered keyword table.
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    /// Builds a keyword classifier.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Classifier`] when a rule names an undeclared
    /// category, a category has two rules, or a keyword is empty.
    pub fn new(categories: CategorySet, rules: Vec<KeywordRule>) -> Result<Self, CorpusError> {
        for (index, rule) in rules.iter().enumerate() {
            if !categories.contains(&rule.category) {
                return Err(CorpusError::Classifier(format!(
                    "keyword rule targets undeclared category: {}",
                    rule.category
                )));
            }
            if rules[.. index].iter().any(|earlier| earlier.category == rule.category) {
                return Err(CorpusError::Classifier(format!(
                    "duplicate keyword rule for category: {}",
                    rule.category
                )));
            }
            if rule.keywords.iter().any(|keyword| keyword.trim().is_empty()) {
                return Err(CorpusError::Classifier(format!(
                    "empty keyword in category: {}",
                    rule.category
                )));
            }
        }
        Ok(Self {
            categories,
            rules,
        })
    }

    /// Returns the default keyword table.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Classifier`] when the built-in table is invalid.
    pub fn with_defaults() -> Result<Self, CorpusError> {
        let categories = CategorySet::new(vec![
            CategoryDefinition::new("core", "Core"),
            CategoryDefinition::new("features", "Features"),
            CategoryDefinition::new("integration", "Integration"),
            CategoryDefinition::new("utilities", "Utilities"),
        ])?;
        let rules = vec![
            KeywordRule::new(
                "core",
                &["core", "fundamental", "basic", "essential", "comprehensive", "parsing validation"],
            ),
            KeywordRule::new(
                "features",
                &["feature", "functionality", "capability", "dotted", "typed", "access", "comment"],
            ),
            KeywordRule::new(
                "integration",
                &[
                    "integration",
                    "e2e",
                    "end-to-end",
                    "workflow",
                    "error",
                    "processing",
                    "composition",
                ],
            ),
            KeywordRule::new(
                "utilities",
                &["util", "helper", "utility", "tool", "common", "pretty", "print", "format"],
            ),
        ];
        Self::new(categories, rules)
    }

    /// Returns the ordered keyword table.
    #[must_use]
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl Classifier for KeywordClassifier {
    fn structure(&self) -> &str {
        KEYWORD_STRUCTURE
    }

    fn categories(&self) -> &CategorySet {
        &self.categories
    }

    fn classify(&self, container: &Container) -> CategoryKey {
        let search = format!(
            "{} {}",
            container.file_name(),
            container.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| search.contains(keyword.as_str())))
            .map_or_else(CategoryKey::other, |rule| rule.category.clone())
    }
}

// ============================================================================
// SECTION: Metadata-Field Strategy
// ============================================================================

/// Classifier keyed on a `meta` field of the first record.
///
/// # Invariants
/// - Feature keys are stored normalized (trimmed, lower-case, `_` for `-`).
/// - Every mapped category is declared in the category set.
#[derive(Debug, Clone)]
pub struct FeatureClassifier {
    /// Declared categories.
    categories: CategorySet,
    /// `meta` field to read.
    field: String,
    /// Normalized feature to category.
    features: BTreeMap<String, CategoryKey>,
}

impl FeatureClassifier {
    /// Builds a metadata-field classifier.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Classifier`] when the field is empty, a mapping
    /// targets an undeclared category, or two features normalize to the same
    /// key.
    pub fn new(
        categories: CategorySet,
        field: impl Into<String>,
        mappings: Vec<(String, CategoryKey)>,
    ) -> Result<Self, CorpusError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(CorpusError::Classifier(String::from("feature field must be non-empty")));
        }
        let mut features = BTreeMap::new();
        for (feature, category) in mappings {
            if !categories.contains(&category) {
                return Err(CorpusError::Classifier(format!(
                    "feature {feature} targets undeclared category: {category}"
                )));
            }
            let normalized = normalize_feature(&feature);
            if normalized.is_empty() {
                return Err(CorpusError::Classifier(String::from("feature key must be non-empty")));
            }
            if features.insert(normalized, category).is_some() {
                return Err(CorpusError::Classifier(format!("duplicate feature key: {feature}")));
            }
        }
        Ok(Self {
            categories,
            field,
            features,
        })
    }

    /// Returns the default feature table reading `meta.feature`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Classifier`] when the built-in table is invalid.
    pub fn with_defaults() -> Result<Self, CorpusError> {
        Self::with_default_table(DEFAULT_FEATURE_FIELD)
    }

    /// Returns the default feature table reading `meta.<field>`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Classifier`] when `field` is empty.
    pub fn with_default_table(field: &str) -> Result<Self, CorpusError> {
        let categories = CategorySet::new(vec![
            CategoryDefinition::new("core-parsing", "Core Parsing"),
            CategoryDefinition::new("advanced-processing", "Advanced Processing"),
            CategoryDefinition::new("object-construction", "Object Construction"),
            CategoryDefinition::new("type-system", "Type System"),
            CategoryDefinition::new("output-validation", "Output & Validation"),
        ])?;
        let mappings = [
            ("parsing", "core-parsing"),
            ("processing", "advanced-processing"),
            ("comments", "advanced-processing"),
            ("object_construction", "object-construction"),
            ("dotted_keys", "object-construction"),
            ("typed_parsing", "type-system"),
            ("pretty_printing", "output-validation"),
            ("error_handling", "output-validation"),
        ]
        .into_iter()
        .map(|(feature, category)| (String::from(feature), CategoryKey::new(category)))
        .collect();
        Self::new(categories, field, mappings)
    }

    /// Returns the `meta` field read from the first record.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the feature value used for a container, if any.
    fn feature_of<'a>(&self, container: &'a Container) -> Option<&'a str> {
        let first = container.records.first()?;
        first.meta_str(&self.field).or_else(|| {
            (container.layout == ContainerLayout::List)
                .then(|| first.first_listed_feature())
                .flatten()
        })
    }
}

impl Classifier for FeatureClassifier {
    fn structure(&self) -> &str {
        FEATURE_STRUCTURE
    }

    fn categories(&self) -> &CategorySet {
        &self.categories
    }

    fn classify(&self, container: &Container) -> CategoryKey {
        self.feature_of(container)
            .and_then(|feature| self.features.get(&normalize_feature(feature)))
            .cloned()
            .unwrap_or_else(CategoryKey::other)
    }
}

/// Normalizes a feature value for table lookup.
#[must_use]
pub fn normalize_feature(feature: &str) -> String {
    feature.trim().to_lowercase().replace('-', "_")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
