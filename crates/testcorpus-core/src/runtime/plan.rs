// crates/testcorpus-core/src/runtime/plan.rs
// ============================================================================
// Module: Repartition Plans
// Description: Staged writes and removals applied by a two-phase commit.
// Purpose: Rewrite the corpus only after every new container is on disk.
// Dependencies: crate::runtime::{fs, partition, reader}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`RepartitionPlan`] is built by one of the variant workflows
//! ([`plan_reorganize`] or [`plan_consolidate`]) and lists every container
//! to write and every file or directory to remove. Nothing touches disk
//! until [`RepartitionPlan::commit`]:
//!
//! 1. Stage: each write goes to a synced temporary sibling. Any failure
//!    removes all temporaries and any directories created for them.
//! 2. Apply: temporaries are renamed over their targets.
//! 3. Remove: consumed files first, then directories that are now empty.
//!    A directory still holding other entries is kept and reported.
//!
//! Plans also render a JSON manifest with record counts and SHA-256 digests
//! so a dry run can show exactly what would change.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::CorpusError;
use crate::core::Container;
use crate::core::HashDigest;
use crate::interfaces::CorpusEvent;
use crate::interfaces::EVENT_DIRECTORY_RETAINED;
use crate::interfaces::EVENT_PLAN_COMMITTED;
use crate::interfaces::EVENT_RECORDS_DROPPED;
use crate::interfaces::EVENT_SCHEMA_MISMATCH;
use crate::interfaces::EventLevel;
use crate::interfaces::EventSink;
use crate::runtime::fs::CorpusRoot;
use crate::runtime::fs::StagedFile;
use crate::runtime::fs::validate_relative_path;
use crate::runtime::partition::SchemaMismatch;
use crate::runtime::partition::VariantLayout;
use crate::runtime::partition::consolidate;
use crate::runtime::partition::is_partitionable;
use crate::runtime::partition::partition;
use crate::runtime::reader::LoadPolicy;
use crate::runtime::reader::RecordStoreReader;

// ============================================================================
// SECTION: Plan Types
// ============================================================================

/// Workflow that produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOperation {
    /// Split tagged records out of source containers.
    Reorganize,
    /// Merge per-tag containers into consolidated files.
    Consolidate,
}

/// A container rendered and ready to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    /// Target path relative to the variants root.
    pub path: PathBuf,
    /// Rendered container bytes.
    pub bytes: Vec<u8>,
    /// Number of records in the container.
    pub records: usize,
    /// Digest of `bytes`.
    pub digest: HashDigest,
}

/// Kind of entry a removal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalKind {
    /// Regular file.
    File,
    /// Directory, removed only when empty.
    Directory,
}

/// An entry to remove after all writes are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRemoval {
    /// Path relative to the variants root.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: RemovalKind,
}

/// Records of one container left out of every output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecords {
    /// Source container location.
    pub container: String,
    /// Record positions within the source container.
    pub positions: Vec<usize>,
}

/// Staged set of writes and removals for one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepartitionPlan {
    /// Producing workflow.
    pub operation: PlanOperation,
    /// Containers to write, in order.
    pub writes: Vec<StagedWrite>,
    /// Entries to remove after writing, in order.
    pub removals: Vec<StagedRemoval>,
    /// Records carrying only unrequested tags.
    pub dropped: Vec<DroppedRecords>,
    /// Schema disagreements seen while consolidating.
    pub schema_mismatches: Vec<SchemaMismatch>,
}

/// Outcome of a committed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// Files written.
    pub written: usize,
    /// Files removed.
    pub removed_files: usize,
    /// Directories removed.
    pub removed_dirs: usize,
    /// Directories kept because they still hold other entries.
    pub retained_dirs: Vec<String>,
}

// ============================================================================
// SECTION: Manifest
// ============================================================================

/// Serializable view of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanManifest {
    /// Producing workflow.
    pub operation: PlanOperation,
    /// Planned writes.
    pub writes: Vec<ManifestWrite>,
    /// Planned removals.
    pub removals: Vec<ManifestRemoval>,
    /// Dropped records per container.
    pub dropped: Vec<DroppedRecords>,
    /// Schema disagreements.
    pub schema_mismatches: Vec<SchemaMismatch>,
}

/// Manifest entry for a planned write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestWrite {
    /// Target path.
    pub path: String,
    /// Record count.
    pub records: usize,
    /// Content digest.
    pub digest: HashDigest,
}

/// Manifest entry for a planned removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRemoval {
    /// Target path.
    pub path: String,
    /// Entry kind.
    pub kind: RemovalKind,
}

// ============================================================================
// SECTION: Plan Construction
// ============================================================================

impl RepartitionPlan {
    /// Creates an empty plan.
    #[must_use]
    pub const fn new(operation: PlanOperation) -> Self {
        Self {
            operation,
            writes: Vec::new(),
            removals: Vec::new(),
            dropped: Vec::new(),
            schema_mismatches: Vec::new(),
        }
    }

    /// Renders a container and adds it to the writes.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Serialization`] when rendering fails.
    pub fn push_write(&mut self, container: &Container) -> Result<(), CorpusError> {
        let bytes = container.to_json_bytes()?;
        self.writes.push(StagedWrite {
            path: container.location.clone(),
            digest: HashDigest::of_bytes(&bytes),
            records: container.len(),
            bytes,
        });
        Ok(())
    }

    /// Adds a removal.
    pub fn push_removal(&mut self, path: impl Into<PathBuf>, kind: RemovalKind) {
        self.removals.push(StagedRemoval {
            path: path.into(),
            kind,
        });
    }

    /// Returns true when the plan changes nothing on disk.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.removals.is_empty()
    }

    /// Returns the total number of dropped records.
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped.iter().map(|dropped| dropped.positions.len()).sum()
    }

    /// Checks that paths are safe and no path is targeted twice.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::UnsafePath`] for unsafe paths and
    /// [`CorpusError::Plan`] for duplicate or conflicting targets.
    pub fn validate(&self) -> Result<(), CorpusError> {
        let mut written = BTreeSet::new();
        for write in &self.writes {
            let path = validate_relative_path(&write.path)?;
            if !written.insert(path) {
                return Err(CorpusError::Plan(format!(
                    "path written twice: {}",
                    write.path.display()
                )));
            }
        }
        let mut removed = BTreeSet::new();
        for removal in &self.removals {
            let path = validate_relative_path(&removal.path)?;
            if written.contains(&path) {
                return Err(CorpusError::Plan(format!(
                    "path both written and removed: {}",
                    removal.path.display()
                )));
            }
            if !removed.insert(path) {
                return Err(CorpusError::Plan(format!(
                    "path removed twice: {}",
                    removal.path.display()
                )));
            }
        }
        for path in &written {
            if let Some(ancestor) = path.ancestors().skip(1).find(|ancestor| {
                self.removals.iter().any(|removal| {
                    removal.kind == RemovalKind::Directory && removal.path.as_path() == *ancestor
                })
            }) {
                return Err(CorpusError::Plan(format!(
                    "write {} lies inside removed directory {}",
                    path.display(),
                    ancestor.display()
                )));
            }
        }
        Ok(())
    }

    /// Returns the serializable manifest.
    #[must_use]
    pub fn manifest(&self) -> PlanManifest {
        PlanManifest {
            operation: self.operation,
            writes: self
                .writes
                .iter()
                .map(|write| ManifestWrite {
                    path: display_path(&write.path),
                    records: write.records,
                    digest: write.digest.clone(),
                })
                .collect(),
            removals: self
                .removals
                .iter()
                .map(|removal| ManifestRemoval {
                    path: display_path(&removal.path),
                    kind: removal.kind,
                })
                .collect(),
            dropped: self.dropped.clone(),
            schema_mismatches: self.schema_mismatches.clone(),
        }
    }

    /// Renders the manifest as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Serialization`] when rendering fails.
    pub fn manifest_json_bytes(&self) -> Result<Vec<u8>, CorpusError> {
        let mut bytes = serde_json::to_vec_pretty(&self.manifest())
            .map_err(|err| CorpusError::Serialization(err.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

// ============================================================================
// SECTION: Commit
// ============================================================================

impl RepartitionPlan {
    /// Applies the plan under `root` with a two-phase commit.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Commit`] naming the failed stage. A `stage`
    /// failure leaves the corpus unchanged. An `apply` failure is not rolled
    /// back: renames before the failing one stay in place, nothing is
    /// removed, and the message lists the targets already replaced. Those
    /// targets may already hold appended records, so the corpus must be
    /// inspected before the workflow is planned again.
    pub fn commit(&self, root: &CorpusRoot, sink: &dyn EventSink) -> Result<CommitReport, CorpusError> {
        self.validate()?;
        let staged = stage_all(root, &self.writes)?;

        for (index, file) in staged.iter().enumerate() {
            if let Err(err) = file.apply() {
                for pending in &staged[index ..] {
                    pending.discard();
                }
                let applied: Vec<String> =
                    self.writes[.. index].iter().map(|write| display_path(&write.path)).collect();
                return Err(CorpusError::Commit {
                    stage: "apply",
                    message: format!("{err}; already applied: [{}]", applied.join(", ")),
                });
            }
        }

        let mut report = CommitReport {
            written: staged.len(),
            ..CommitReport::default()
        };
        for removal in self.removals.iter().filter(|removal| removal.kind == RemovalKind::File) {
            root.remove_file(&removal.path).map_err(|err| CorpusError::Commit {
                stage: "remove",
                message: err.to_string(),
            })?;
            report.removed_files += 1;
        }
        for removal in self.removals.iter().filter(|removal| removal.kind == RemovalKind::Directory) {
            let removed = root.remove_dir_if_empty(&removal.path).map_err(|err| {
                CorpusError::Commit {
                    stage: "remove",
                    message: err.to_string(),
                }
            })?;
            if removed {
                report.removed_dirs += 1;
            } else {
                let path = display_path(&removal.path);
                sink.record(
                    &CorpusEvent::new(EVENT_DIRECTORY_RETAINED, EventLevel::Warn)
                        .with_container(path.clone())
                        .with_detail("directory still holds other entries"),
                );
                report.retained_dirs.push(path);
            }
        }

        sink.record(
            &CorpusEvent::new(EVENT_PLAN_COMMITTED, EventLevel::Info)
                .with_detail(format!(
                    "{} wrote {} files, removed {} files and {} directories",
                    operation_label(self.operation),
                    report.written,
                    report.removed_files,
                    report.removed_dirs
                ))
                .with_count(report.written),
        );
        Ok(report)
    }
}

/// Stages every write, rolling back all of them on the first failure.
fn stage_all(root: &CorpusRoot, writes: &[StagedWrite]) -> Result<Vec<StagedFile>, CorpusError> {
    let mut staged: Vec<StagedFile> = Vec::with_capacity(writes.len());
    for write in writes {
        match root.stage_write(&write.path, &write.bytes) {
            Ok(file) => staged.push(file),
            Err(err) => {
                rollback(root, &staged);
                return Err(CorpusError::Commit {
                    stage: "stage",
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(staged)
}

/// Removes staged temporaries and the directories created for them.
fn rollback(root: &CorpusRoot, staged: &[StagedFile]) {
    for file in staged {
        file.discard();
    }
    for file in staged.iter().rev() {
        for dir in file.created_dirs().iter().rev() {
            let _ = root.remove_dir_if_empty(dir);
        }
    }
}

/// Returns the event label for an operation.
const fn operation_label(operation: PlanOperation) -> &'static str {
    match operation {
        PlanOperation::Reorganize => "reorganize",
        PlanOperation::Consolidate => "consolidate",
    }
}

/// Renders a relative path with forward slashes.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ============================================================================
// SECTION: Workflows
// ============================================================================

/// Plans extraction of tagged records out of the source directory.
///
/// Each non-empty tag subset is written to `<tag dir>/<path below source>`,
/// appended after the records of any container already there; an existing
/// target keeps its own header and reports a differing schema. A source
/// whose records changed is rewritten with its residual, or removed when the
/// residual is empty and the layout allows it. Containers with an
/// unrecognized layout are left untouched.
///
/// # Errors
///
/// Returns the first load failure (fail-fast), or [`CorpusError::Plan`] when
/// the layout or the resulting plan is inconsistent.
pub fn plan_reorganize(
    reader: &RecordStoreReader,
    layout: &VariantLayout,
    sink: &dyn EventSink,
) -> Result<RepartitionPlan, CorpusError> {
    layout.validate()?;
    let source_dir = validate_relative_path(&layout.source_dir)?;
    let loaded = reader.load_dir(&source_dir, LoadPolicy::FailFast, sink)?;
    let tags = layout.requested_tags();
    let mut plan = RepartitionPlan::new(PlanOperation::Reorganize);
    for container in loaded.containers.iter().filter(|container| is_partitionable(container.layout)) {
        let split = partition(container, &tags);
        if !split.dropped.is_empty() {
            sink.record(
                &CorpusEvent::new(EVENT_RECORDS_DROPPED, EventLevel::Warn)
                    .with_container(display_path(&container.location))
                    .with_detail("records carry only unrequested variant tags")
                    .with_count(split.dropped.len()),
            );
            plan.dropped.push(DroppedRecords {
                container: display_path(&container.location),
                positions: split.dropped.clone(),
            });
        }
        let below_source = container
            .location
            .strip_prefix(&source_dir)
            .map_or_else(|_| PathBuf::from(container.file_name()), Path::to_path_buf);
        for (tag, subset) in &split.subsets {
            if subset.is_empty() {
                continue;
            }
            let Some(tag_layout) = layout.tag_layout(tag) else {
                continue;
            };
            let target = tag_layout.dir.join(&below_source);
            let write = match existing_target(reader, &target)? {
                Some(existing) => {
                    append_onto(existing, std::slice::from_ref(subset), &mut plan, sink)
                }
                None => subset.clone().with_location(target),
            };
            plan.push_write(&write)?;
        }
        if split.residual_changed() {
            if split.residual.is_empty() && layout.remove_empty_sources {
                plan.push_removal(container.location.clone(), RemovalKind::File);
            } else {
                plan.push_write(&split.residual)?;
            }
        }
    }
    plan.validate()?;
    Ok(plan)
}

/// Plans merging every tag directory into its consolidated file.
///
/// Inputs are the consolidated file itself when it already exists, followed
/// by the tag directory's containers in lexicographic order. An existing
/// consolidated file keeps its header, and one without a records field
/// aborts the plan. Consumed files
/// are removed, then their directories from deepest to the tag directory.
/// Tag directories without containers are skipped.
///
/// # Errors
///
/// Returns the first load failure (fail-fast), or [`CorpusError::Plan`] when
/// the layout or the resulting plan is inconsistent.
pub fn plan_consolidate(
    reader: &RecordStoreReader,
    layout: &VariantLayout,
    sink: &dyn EventSink,
) -> Result<RepartitionPlan, CorpusError> {
    layout.validate()?;
    let mut plan = RepartitionPlan::new(PlanOperation::Consolidate);
    for tag_layout in &layout.tags {
        let tag_dir = validate_relative_path(&tag_layout.dir)?;
        let loaded = reader.load_dir(&tag_dir, LoadPolicy::FailFast, sink)?;
        let consumed: Vec<&Container> = loaded
            .containers
            .iter()
            .filter(|container| is_partitionable(container.layout))
            .collect();
        if consumed.is_empty() {
            continue;
        }
        let target = layout.consolidated_location(tag_layout);
        let inputs: Vec<Container> = consumed.iter().map(|container| (*container).clone()).collect();
        let mut merged = match existing_target(reader, &target)? {
            Some(existing) => append_onto(existing, &inputs, &mut plan, sink),
            None => {
                let outcome = consolidate(target, &inputs);
                note_schema_mismatches(&mut plan, sink, outcome.schema_mismatches);
                outcome.container
            }
        };
        if merged.schema.is_none() {
            merged.schema.clone_from(&layout.default_schema);
        }
        if !merged.is_empty() {
            plan.push_write(&merged)?;
        }
        let mut dirs = BTreeSet::new();
        for container in &consumed {
            plan.push_removal(container.location.clone(), RemovalKind::File);
            for ancestor in container.location.ancestors().skip(1) {
                if !ancestor.starts_with(&tag_dir) {
                    break;
                }
                dirs.insert(ancestor.to_path_buf());
            }
        }
        let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
        dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
        for dir in dirs {
            plan.push_removal(dir, RemovalKind::Directory);
        }
    }
    plan.validate()?;
    Ok(plan)
}

/// Loads an existing target container, if any.
///
/// A target without a records field is never overwritten.
fn existing_target(
    reader: &RecordStoreReader,
    target: &Path,
) -> Result<Option<Container>, CorpusError> {
    if !reader.root().is_file(target) {
        return Ok(None);
    }
    let existing = reader.load(target)?;
    if !is_partitionable(existing.layout) {
        return Err(CorpusError::Plan(format!(
            "existing target has no records field: {}",
            target.display()
        )));
    }
    Ok(Some(existing))
}

/// Appends the records of `inputs` to an existing target.
///
/// The target keeps its description, extra fields, layout and schema. Inputs
/// whose schema disagrees are reported; a target without a schema takes the
/// first one found.
fn append_onto(
    mut existing: Container,
    inputs: &[Container],
    plan: &mut RepartitionPlan,
    sink: &dyn EventSink,
) -> Container {
    let mut all = Vec::with_capacity(inputs.len() + 1);
    all.push(existing.clone());
    all.extend(inputs.iter().cloned());
    let outcome = consolidate(existing.location.clone(), &all);
    note_schema_mismatches(plan, sink, outcome.schema_mismatches);
    existing.schema = outcome.container.schema;
    existing.records = outcome.container.records;
    existing
}

/// Emits one event per schema mismatch and records them in the plan.
fn note_schema_mismatches(
    plan: &mut RepartitionPlan,
    sink: &dyn EventSink,
    mismatches: Vec<SchemaMismatch>,
) {
    for mismatch in &mismatches {
        sink.record(
            &CorpusEvent::new(EVENT_SCHEMA_MISMATCH, EventLevel::Warn)
                .with_container(mismatch.container.clone())
                .with_detail(format!("expected {}, found {}", mismatch.expected, mismatch.found)),
        );
    }
    plan.schema_mismatches.extend(mismatches);
}

// ============================================================================
// SECTION: Tests
// ============================================================================
