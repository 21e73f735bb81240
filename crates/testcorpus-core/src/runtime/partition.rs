// crates/testcorpus-core/src/runtime/partition.rs
// ============================================================================
// Module: Variant Partitioner
// Description: Split containers by variant tag and merge them back.
// Purpose: Move tagged records between files without losing or reordering them.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`partition`] splits one container into a subset per requested tag plus a
//! residual of untagged records. A record carrying several requested tags is
//! placed in every matching subset. A record whose tags are all unrequested
//! belongs to no subset and is not kept in the residual; its position is
//! reported in [`VariantPartition::dropped`] so callers can surface it.
//!
//! [`consolidate`] is the inverse for single-tag containers: it concatenates
//! records in arrival order and keeps the first schema reference it sees,
//! reporting every container that disagrees.
//!
//! [`VariantLayout`] describes where each tag's files live on disk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::CorpusError;
use crate::core::Container;
use crate::core::ContainerLayout;
use crate::core::VariantTag;
use crate::runtime::fs::validate_relative_path;

// ============================================================================
// SECTION: Partition
// ============================================================================

/// Result of splitting one container by variant tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPartition {
    /// Location of the source container.
    pub source: PathBuf,
    /// Number of records in the source container.
    pub source_len: usize,
    /// One subset per requested tag, in request order.
    pub subsets: Vec<(VariantTag, Container)>,
    /// Untagged records, in source order.
    pub residual: Container,
    /// Source positions of records carrying only unrequested tags.
    pub dropped: Vec<usize>,
}

impl VariantPartition {
    /// Returns the subset for a tag.
    #[must_use]
    pub fn subset(&self, tag: &VariantTag) -> Option<&Container> {
        self.subsets.iter().find(|(candidate, _)| candidate == tag).map(|(_, subset)| subset)
    }

    /// Returns true when any record left the residual.
    #[must_use]
    pub fn residual_changed(&self) -> bool {
        self.residual.len() != self.source_len
    }
}

/// Splits a container into per-tag subsets and an untagged residual.
///
/// Requested tags are de-duplicated keeping first occurrence. Subsets and the
/// residual keep the source location, schema, description, and layout.
#[must_use]
pub fn partition(container: &Container, tags: &[VariantTag]) -> VariantPartition {
    let mut requested: Vec<&VariantTag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !requested.contains(&tag) {
            requested.push(tag);
        }
    }
    let subsets = requested
        .iter()
        .map(|tag| {
            let records = container
                .records
                .iter()
                .filter(|record| record.has_variant(tag))
                .cloned()
                .collect();
            ((*tag).clone(), container.derive(container.location.clone(), records))
        })
        .collect();
    let mut residual = Vec::new();
    let mut dropped = Vec::new();
    for (index, record) in container.records.iter().enumerate() {
        if record.is_untagged() {
            residual.push(record.clone());
        } else if !requested.iter().any(|tag| record.has_variant(tag)) {
            dropped.push(index);
        }
    }
    VariantPartition {
        source: container.location.clone(),
        source_len: container.len(),
        subsets,
        residual: container.derive(container.location.clone(), residual),
        dropped,
    }
}

// ============================================================================
// SECTION: Consolidation
// ============================================================================

/// A consolidated input whose schema differs from the one kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaMismatch {
    /// Location of the disagreeing container.
    pub container: String,
    /// Schema kept for the consolidated container.
    pub expected: String,
    /// Schema found in the disagreeing container.
    pub found: String,
}

/// Result of merging containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateOutcome {
    /// Merged container.
    pub container: Container,
    /// Inputs whose schema disagreed with the first one seen.
    pub schema_mismatches: Vec<SchemaMismatch>,
}

/// Concatenates container records in arrival order.
///
/// The merged container carries the first schema reference encountered.
/// Inputs without a schema are not treated as disagreeing.
#[must_use]
pub fn consolidate(location: impl Into<PathBuf>, inputs: &[Container]) -> ConsolidateOutcome {
    let mut schema: Option<&str> = None;
    let mut schema_mismatches = Vec::new();
    let mut records = Vec::new();
    for input in inputs {
        if let Some(found) = input.schema.as_deref() {
            match schema {
                None => schema = Some(found),
                Some(expected) if expected != found => schema_mismatches.push(SchemaMismatch {
                    container: input.location.display().to_string(),
                    expected: expected.to_string(),
                    found: found.to_string(),
                }),
                Some(_) => {}
            }
        }
        records.extend(input.records.iter().cloned());
    }
    let mut container = Container::new(location).with_records(records);
    container.schema = schema.map(str::to_string);
    ConsolidateOutcome {
        container,
        schema_mismatches,
    }
}

// ============================================================================
// SECTION: Variant Layout
// ============================================================================

/// Default source directory holding untagged containers.
pub const DEFAULT_SOURCE_DIR: &str = "core";

/// On-disk placement of one variant tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTagLayout {
    /// Variant tag.
    pub tag: VariantTag,
    /// Directory receiving extracted subsets, relative to the variants root.
    pub dir: PathBuf,
    /// File name of the consolidated container inside the source directory.
    pub consolidated_file: String,
}

impl VariantTagLayout {
    /// Creates a tag layout with the default consolidated file name.
    #[must_use]
    pub fn new(tag: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            tag: VariantTag::new(tag),
            dir: dir.into(),
            consolidated_file: format!("api_{tag}.json"),
        }
    }
}

/// Directory layout used by the variant workflows.
///
/// # Invariants
/// - Tag names and directories are unique.
/// - No tag directory equals the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantLayout {
    /// Source directory, relative to the variants root.
    pub source_dir: PathBuf,
    /// Tag placements in request order.
    pub tags: Vec<VariantTagLayout>,
    /// Schema used when no consolidated input carries one.
    pub default_schema: Option<String>,
    /// Remove source containers whose residual becomes empty.
    pub remove_empty_sources: bool,
}

impl Default for VariantLayout {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            tags: vec![
                VariantTagLayout::new("proposed_behavior", "proposed"),
                VariantTagLayout::new("reference_compliant", "reference"),
            ],
            default_schema: None,
            remove_empty_sources: true,
        }
    }
}

impl VariantLayout {
    /// Returns the requested tags in order.
    #[must_use]
    pub fn requested_tags(&self) -> Vec<VariantTag> {
        self.tags.iter().map(|layout| layout.tag.clone()).collect()
    }

    /// Returns the placement for a tag.
    #[must_use]
    pub fn tag_layout(&self, tag: &VariantTag) -> Option<&VariantTagLayout> {
        self.tags.iter().find(|layout| &layout.tag == tag)
    }

    /// Returns the consolidated file location for a tag layout.
    #[must_use]
    pub fn consolidated_location(&self, layout: &VariantTagLayout) -> PathBuf {
        self.source_dir.join(&layout.consolidated_file)
    }

    /// Validates directory and tag consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Plan`] or [`CorpusError::UnsafePath`] when the
    /// layout is inconsistent or escapes the variants root.
    pub fn validate(&self) -> Result<(), CorpusError> {
        let source_dir = validate_relative_path(&self.source_dir)?;
        if self.tags.is_empty() {
            return Err(CorpusError::Plan(String::from("variant layout declares no tags")));
        }
        let mut names = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        let mut files = BTreeSet::new();
        for layout in &self.tags {
            if layout.tag.as_str().trim().is_empty() {
                return Err(CorpusError::Plan(String::from("variant tag must be non-empty")));
            }
            if !names.insert(layout.tag.as_str()) {
                return Err(CorpusError::Plan(format!("duplicate variant tag: {}", layout.tag)));
            }
            let dir = validate_relative_path(&layout.dir)?;
            if dir == source_dir || dir.starts_with(&source_dir) || source_dir.starts_with(&dir) {
                return Err(CorpusError::Plan(format!(
                    "variant directory overlaps source directory: {}",
                    dir.display()
                )));
            }
            if !dirs.insert(dir) {
                return Err(CorpusError::Plan(format!(
                    "duplicate variant directory for tag: {}",
                    layout.tag
                )));
            }
            if !is_plain_file_name(&layout.consolidated_file) {
                return Err(CorpusError::Plan(format!(
                    "consolidated file must be a plain file name: {}",
                    layout.consolidated_file
                )));
            }
            if !files.insert(layout.consolidated_file.as_str()) {
                return Err(CorpusError::Plan(format!(
                    "duplicate consolidated file: {}",
                    layout.consolidated_file
                )));
            }
        }
        Ok(())
    }
}

/// Returns true when the value is a single normal path component.
fn is_plain_file_name(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

/// Returns true when a container layout can be rewritten by the workflows.
#[must_use]
pub const fn is_partitionable(layout: ContainerLayout) -> bool {
    matches!(layout, ContainerLayout::Suite | ContainerLayout::List)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
