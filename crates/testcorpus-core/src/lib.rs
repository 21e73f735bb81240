// crates/testcorpus-core/src/lib.rs
// ============================================================================
// Module: Test Corpus Core Library
// Description: Public API surface for the test corpus engine.
// Purpose: Expose corpus types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! The test corpus engine loads containers of test-case records, classifies
//! them into reporting categories, aggregates summary statistics, and
//! repartitions records across files by variant tag. Records are opaque: the
//! engine only reads the small metadata header (`function`, `meta`,
//! `variants`) and carries every other field through unchanged.
//!
//! Destructive corpus rewrites go through [`runtime::RepartitionPlan`], a
//! two-phase commit that stages every write before any file is replaced or
//! removed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Errors
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the corpus engine.
///
/// # Invariants
/// - Container-scoped variants always carry the offending container name.
/// - [`CorpusError::UnsafePath`] always includes the rejected path.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Malformed container content.
    #[error("failed to parse container {container}: {message}")]
    Parse {
        /// Container name or relative location.
        container: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Container could not be read or written.
    #[error("io error on {container}: {message}")]
    Io {
        /// Container name, relative location, or corpus root.
        container: String,
        /// Underlying I/O diagnostic.
        message: String,
    },
    /// Container exceeds the configured read limit.
    #[error("container {container} is {size} bytes (limit {limit})")]
    TooLarge {
        /// Container name or relative location.
        container: String,
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
    /// Path is absolute, escapes the root, or traverses a symlink.
    #[error("unsafe corpus path: {0}")]
    UnsafePath(PathBuf),
    /// Classifier tables are inconsistent.
    #[error("invalid classifier: {0}")]
    Classifier(String),
    /// Repartition plan is inconsistent.
    #[error("invalid repartition plan: {0}")]
    Plan(String),
    /// Two-phase commit failed.
    #[error("commit failed during {stage}: {message}")]
    Commit {
        /// Commit stage label (`stage`, `apply`, `remove`).
        stage: &'static str,
        /// Failure diagnostic.
        message: String,
    },
    /// Report patch rule is invalid.
    #[error("invalid report pattern: {0}")]
    Pattern(String),
    /// Serialization failure while rendering outputs.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CorpusError {
    /// Returns true when aggregation runs may skip the container and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Io { .. } | Self::TooLarge { .. })
    }
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Classifier;
pub use interfaces::CorpusEvent;
pub use interfaces::EventLevel;
pub use interfaces::EventSink;
pub use interfaces::PatchChange;
pub use interfaces::PatchField;
pub use interfaces::PatchOutcome;
pub use interfaces::ReportPatcher;
pub use runtime::Aggregator;
pub use runtime::ConsolidateOutcome;
pub use runtime::FeatureClassifier;
pub use runtime::KeywordClassifier;
pub use runtime::KeywordRule;
pub use runtime::LoadPolicy;
pub use runtime::LoadedCorpus;
pub use runtime::PatternReportPatcher;
pub use runtime::RecordStoreReader;
pub use runtime::RepartitionPlan;
pub use runtime::SchemaMismatch;
pub use runtime::VariantLayout;
pub use runtime::VariantPartition;
pub use runtime::VariantTagLayout;
pub use runtime::consolidate;
pub use runtime::partition;
