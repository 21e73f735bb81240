// crates/testcorpus-core/src/core/summary.rs
// ============================================================================
// Module: Corpus Summary
// Description: Per-category record tallies and grand totals.
// Purpose: Hold the aggregation result and render it deterministically.
// Dependencies: serde, serde_json, crate::core::{category, hashing}
// ============================================================================

//! ## Overview
//! A [`Summary`] maps every declared category to a tally of
//! `{container name -> record count}` plus a running total, and carries the
//! grand totals. Categories serialize in declaration order and file names in
//! lexicographic order, so the rendered JSON is byte-identical across runs.
//!
//! Serialized shape:
//! `{ structure, categories: { key: { total, files } }, totalTests, totalFiles }`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde::ser::SerializeStruct;

use crate::CorpusError;
use crate::core::category::CategoryKey;
use crate::core::category::CategorySet;
use crate::core::hashing::HashDigest;

// ============================================================================
// SECTION: Tallies
// ============================================================================

/// Record counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    /// Display label (not serialized).
    #[serde(skip)]
    pub label: String,
    /// Sum of all file counts.
    pub total: usize,
    /// Container name to record count.
    pub files: BTreeMap<String, usize>,
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregated corpus statistics.
///
/// # Invariants
/// - Every category of the originating set is present, in declaration order.
/// - `total_tests` equals the sum of all category totals.
/// - `total_files` counts containers that contributed at least one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Classification structure tag (for example `flat`).
    pub structure: String,
    /// Category tallies in declaration order.
    categories: Vec<(CategoryKey, CategoryTally)>,
    /// Total records across all categories.
    pub total_tests: usize,
    /// Number of contributing containers.
    pub total_files: usize,
}

impl Summary {
    /// Creates an empty summary covering every category in the set.
    #[must_use]
    pub fn new(structure: impl Into<String>, categories: &CategorySet) -> Self {
        let categories = categories
            .iter()
            .map(|definition| {
                (
                    definition.key.clone(),
                    CategoryTally {
                        label: definition.label.clone(),
                        total: 0,
                        files: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self {
            structure: structure.into(),
            categories,
            total_tests: 0,
            total_files: 0,
        }
    }

    /// Adds a contributing container to the summary.
    ///
    /// A repeated name in the same category merges its counts. Unknown keys
    /// are folded into `other`, and zero counts are ignored.
    pub fn add_container(&mut self, key: &CategoryKey, name: &str, count: usize) {
        if count == 0 {
            return;
        }
        let index = self
            .categories
            .iter()
            .position(|(candidate, _)| candidate == key)
            .or_else(|| self.categories.iter().position(|(candidate, _)| candidate.is_other()));
        let Some(index) = index else {
            return;
        };
        let tally = &mut self.categories[index].1;
        *tally.files.entry(name.to_string()).or_insert(0) += count;
        tally.total += count;
        self.total_tests += count;
        self.total_files += 1;
    }

    /// Returns the tally for a category.
    #[must_use]
    pub fn category(&self, key: &CategoryKey) -> Option<&CategoryTally> {
        self.categories.iter().find(|(candidate, _)| candidate == key).map(|(_, tally)| tally)
    }

    /// Returns the total for a category, or zero when unknown.
    #[must_use]
    pub fn category_total(&self, key: &CategoryKey) -> usize {
        self.category(key).map_or(0, |tally| tally.total)
    }

    /// Iterates category tallies in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = (&CategoryKey, &CategoryTally)> {
        self.categories.iter().map(|(key, tally)| (key, tally))
    }

    /// Renders the summary as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Serialization`] when rendering fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CorpusError> {
        let mut bytes = serde_json::to_vec_pretty(self)
            .map_err(|err| CorpusError::Serialization(err.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Returns the SHA-256 digest of the canonical summary JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Serialization`] when canonicalization fails.
    pub fn digest(&self) -> Result<HashDigest, CorpusError> {
        HashDigest::of_canonical_json(self)
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Summary", 4)?;
        state.serialize_field("structure", &self.structure)?;
        state.serialize_field("categories", &OrderedCategories(&self.categories))?;
        state.serialize_field("totalTests", &self.total_tests)?;
        state.serialize_field("totalFiles", &self.total_files)?;
        state.end()
    }
}

/// Serializes category tallies as a map in declaration order.
struct OrderedCategories<'a>(&'a [(CategoryKey, CategoryTally)]);

impl Serialize for OrderedCategories<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, tally) in self.0 {
            map.serialize_entry(key.as_str(), tally)?;
        }
        map.end()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
