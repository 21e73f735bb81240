// crates/testcorpus-core/src/runtime/mod.rs
// ============================================================================
// Module: Test Corpus Runtime
// Description: Reader, classifiers, aggregator, partitioner, plans, and patcher.
// Purpose: Execute corpus statistics and variant workflows against a root.
// Dependencies: crate::{core, interfaces}, cap-std, regex
// ============================================================================

//! ## Overview
//! Runtime modules implement every corpus workflow on top of the core data
//! model. All filesystem access goes through [`CorpusRoot`], so each command
//! sees the same path rules and the same atomic write behavior.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregate;
pub mod classify;
pub mod fs;
pub mod partition;
pub mod patch;
pub mod plan;
pub mod reader;
pub mod sinks;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::Aggregator;
pub use classify::DEFAULT_FEATURE_FIELD;
pub use classify::FEATURE_STRUCTURE;
pub use classify::FeatureClassifier;
pub use classify::KEYWORD_STRUCTURE;
pub use classify::KeywordClassifier;
pub use classify::KeywordRule;
pub use classify::normalize_feature;
pub use fs::CorpusRoot;
pub use fs::StagedFile;
pub use fs::validate_relative_path;
pub use partition::ConsolidateOutcome;
pub use partition::DEFAULT_SOURCE_DIR;
pub use partition::SchemaMismatch;
pub use partition::VariantLayout;
pub use partition::VariantPartition;
pub use partition::VariantTagLayout;
pub use partition::consolidate;
pub use partition::is_partitionable;
pub use partition::partition;
pub use patch::PatchRule;
pub use patch::PatternReportPatcher;
pub use plan::CommitReport;
pub use plan::DroppedRecords;
pub use plan::ManifestRemoval;
pub use plan::ManifestWrite;
pub use plan::PlanManifest;
pub use plan::PlanOperation;
pub use plan::RemovalKind;
pub use plan::RepartitionPlan;
pub use plan::StagedRemoval;
pub use plan::StagedWrite;
pub use plan::plan_consolidate;
pub use plan::plan_reorganize;
pub use reader::DEFAULT_EXCLUDE_SUFFIX;
pub use reader::DEFAULT_EXTENSION;
pub use reader::DEFAULT_MAX_CONTAINER_BYTES;
pub use reader::LoadPolicy;
pub use reader::LoadedCorpus;
pub use reader::ReaderOptions;
pub use reader::RecordStoreReader;
pub use reader::SkippedContainer;
pub use sinks::FileEventSink;
pub use sinks::MemoryEventSink;
pub use sinks::NoopEventSink;
pub use sinks::StderrEventSink;
