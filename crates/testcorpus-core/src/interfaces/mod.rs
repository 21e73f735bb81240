// crates/testcorpus-core/src/interfaces/mod.rs
// ============================================================================
// Module: Test Corpus Interfaces
// Description: Seams for classification, event logging, and report patching.
// Purpose: Define the contract surfaces the corpus runtime depends on.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Interfaces keep the runtime independent of strategy and presentation
//! choices. Classifiers are selected once at construction time; event sinks
//! receive structured payloads and decide where they go; report patchers
//! receive a summary and a text and return the proposed rewrite without
//! touching disk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use serde::Serializer;

use crate::CorpusError;
use crate::core::CategoryKey;
use crate::core::CategorySet;
use crate::core::Container;
use crate::core::Summary;

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Pure container classification strategy.
///
/// # Invariants
/// - `classify` always returns a key contained in `categories()`.
/// - Implementations never inspect record payloads.
pub trait Classifier: Send + Sync {
    /// Structure tag reported in summaries (for example `flat`).
    fn structure(&self) -> &str;

    /// Closed category set, ending with `other`.
    fn categories(&self) -> &CategorySet;

    /// Classifies a container.
    fn classify(&self, container: &Container) -> CategoryKey;
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// A container failed to load and was skipped.
pub const EVENT_CONTAINER_SKIPPED: &str = "container_skipped";
/// A symlinked entry was skipped during discovery.
pub const EVENT_SYMLINK_SKIPPED: &str = "symlink_skipped";
/// Two contributing containers share a file-derived name.
pub const EVENT_NAME_COLLISION: &str = "container_name_collision";
/// Records carrying only unrequested tags left no output.
pub const EVENT_RECORDS_DROPPED: &str = "records_dropped";
/// Consolidated containers disagree on their schema reference.
pub const EVENT_SCHEMA_MISMATCH: &str = "schema_mismatch";
/// A repartition plan was committed.
pub const EVENT_PLAN_COMMITTED: &str = "plan_committed";
/// A directory kept foreign entries and was not removed.
pub const EVENT_DIRECTORY_RETAINED: &str = "directory_retained";

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    /// Routine progress.
    Info,
    /// Degraded but continuing.
    Warn,
}

/// Structured corpus event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event severity.
    pub level: EventLevel,
    /// Container or path the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Free-form detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Associated count (records, files).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl CorpusEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event: &'static str, level: EventLevel) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            level,
            container: None,
            detail: None,
            count: None,
        }
    }

    /// Sets the container the event concerns.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Sets the detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the associated count.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Event sink for structured corpus events.
pub trait EventSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: &CorpusEvent);
}

// ============================================================================
// SECTION: Report Patching
// ============================================================================

/// Summary quantity a report rule targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatchField {
    /// Grand total of records.
    TotalTests,
    /// Number of contributing containers.
    TotalFiles,
    /// Total of one category.
    Category(CategoryKey),
}

impl PatchField {
    /// Returns the summary value for this field.
    #[must_use]
    pub fn value(&self, summary: &Summary) -> Option<usize> {
        match self {
            Self::TotalTests => Some(summary.total_tests),
            Self::TotalFiles => Some(summary.total_files),
            Self::Category(key) => summary.category(key).map(|tally| tally.total),
        }
    }
}

impl fmt::Display for PatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalTests => f.write_str("total_tests"),
            Self::TotalFiles => f.write_str("total_files"),
            Self::Category(key) => write!(f, "category:{key}"),
        }
    }
}

impl FromStr for PatchField {
    type Err = CorpusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "total_tests" => Ok(Self::TotalTests),
            "total_files" => Ok(Self::TotalFiles),
            other => match other.strip_prefix("category:") {
                Some(key) if !key.is_empty() => Ok(Self::Category(CategoryKey::new(key))),
                _ => Err(CorpusError::Pattern(format!("unknown report field: {other}"))),
            },
        }
    }
}

impl Serialize for PatchField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One numeric replacement applied to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchChange {
    /// Field that changed.
    pub field: PatchField,
    /// Text previously captured.
    pub previous: String,
    /// Value written.
    pub current: usize,
}

/// Result of patching a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    /// Patched text (equal to the input when nothing changed).
    pub text: String,
    /// Applied changes in rule order.
    pub changes: Vec<PatchChange>,
    /// Fields whose pattern did not match the text.
    pub unmatched: Vec<PatchField>,
}

impl PatchOutcome {
    /// Returns true when any field changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Text-patch boundary between a summary and a human-maintained report.
pub trait ReportPatcher {
    /// Computes the patched report text.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Pattern`] when a rule targets a category the
    /// summary does not contain.
    fn patch(&self, text: &str, summary: &Summary) -> Result<PatchOutcome, CorpusError>;
}
