// crates/testcorpus-core/src/core/category.rs
// ============================================================================
// Module: Reporting Categories
// Description: Category keys, labels, and the ordered category set.
// Purpose: Give every classification strategy a closed, ordered bucket set.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`CategorySet`] is the closed set of buckets a classifier may return. It
//! preserves declaration order for reporting and always ends with the `other`
//! fallback, so classification is total.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::CorpusError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key of the fallback category.
pub const OTHER_CATEGORY: &str = "other";

/// Display label of the fallback category.
pub const OTHER_LABEL: &str = "Other";

// ============================================================================
// SECTION: Category Types
// ============================================================================

/// Stable category identifier (for example `core-parsing`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    /// Creates a category key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the fallback category key.
    #[must_use]
    pub fn other() -> Self {
        Self::new(OTHER_CATEGORY)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the fallback category.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.0 == OTHER_CATEGORY
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared category with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Stable key.
    pub key: CategoryKey,
    /// Human-readable label used in reports.
    pub label: String,
}

impl CategoryDefinition {
    /// Creates a category definition.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: CategoryKey::new(key),
            label: label.into(),
        }
    }
}

// ============================================================================
// SECTION: Category Set
// ============================================================================

/// Ordered, closed set of categories.
///
/// # Invariants
/// - Keys are unique.
/// - The last entry is always the `other` fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    /// Declared categories in report order.
    definitions: Vec<CategoryDefinition>,
}

impl CategorySet {
    /// Builds a category set, appending `other` when not declared.
    ///
    /// A declared `other` is moved to the end so its label is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Classifier`] when a key is empty or repeated.
    pub fn new(definitions: Vec<CategoryDefinition>) -> Result<Self, CorpusError> {
        let mut ordered = Vec::with_capacity(definitions.len() + 1);
        let mut other = None;
        for definition in definitions {
            if definition.key.as_str().trim().is_empty() {
                return Err(CorpusError::Classifier(String::from("category key must be non-empty")));
            }
            let duplicate = ordered.iter().any(|seen: &CategoryDefinition| seen.key == definition.key)
                || (definition.key.is_other() && other.is_some());
            if duplicate {
                return Err(CorpusError::Classifier(format!(
                    "duplicate category key: {}",
                    definition.key
                )));
            }
            if definition.key.is_other() {
                other = Some(definition);
            } else {
                ordered.push(definition);
            }
        }
        ordered.push(other.unwrap_or_else(|| CategoryDefinition::new(OTHER_CATEGORY, OTHER_LABEL)));
        Ok(Self {
            definitions: ordered,
        })
    }

    /// Returns true when the key is part of the set.
    #[must_use]
    pub fn contains(&self, key: &CategoryKey) -> bool {
        self.definitions.iter().any(|definition| &definition.key == key)
    }

    /// Returns the display label for a key.
    #[must_use]
    pub fn label(&self, key: &CategoryKey) -> Option<&str> {
        self.definitions
            .iter()
            .find(|definition| &definition.key == key)
            .map(|definition| definition.label.as_str())
    }

    /// Iterates definitions in report order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryDefinition> {
        self.definitions.iter()
    }

    /// Returns the number of categories, including `other`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always false; the fallback category is always present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

    use super::CategoryDefinition;
    use super::CategoryKey;
    use super::CategorySet;

    #[test]
    fn other_is_appended_last() {
        let set = CategorySet::new(vec![CategoryDefinition::new("core", "Core")]).expect("set");
        let keys: Vec<&str> = set.iter().map(|definition| definition.key.as_str()).collect();
        assert_eq!(keys, vec!["core", "other"]);
        assert_eq!(set.label(&CategoryKey::other()), Some("Other"));
    }

    #[test]
    fn declared_other_moves_to_end_and_keeps_label() {
        let set = CategorySet::new(vec![
            CategoryDefinition::new("other", "Misc"),
            CategoryDefinition::new("core", "Core"),
        ])
        .expect("set");
        let keys: Vec<&str> = set.iter().map(|definition| definition.key.as_str()).collect();
        assert_eq!(keys, vec!["core", "other"]);
        assert_eq!(set.label(&CategoryKey::other()), Some("Misc"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = CategorySet::new(vec![
            CategoryDefinition::new("core", "Core"),
            CategoryDefinition::new("core", "Core again"),
        ]);
        assert!(result.is_err());
    }
}
