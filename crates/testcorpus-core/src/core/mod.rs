// crates/testcorpus-core/src/core/mod.rs
// ============================================================================
// Module: Test Corpus Core Types
// Description: Records, containers, categories, summaries, and hashing.
// Purpose: Provide the shared data model used by every corpus workflow.
// Dependencies: serde, serde_json, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Core types are pure data: they parse, render, and hash, but never touch
//! the filesystem. Runtime modules build on them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod category;
pub mod hashing;
pub mod record;
pub mod summary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use category::CategoryDefinition;
pub use category::CategoryKey;
pub use category::CategorySet;
pub use category::OTHER_CATEGORY;
pub use category::OTHER_LABEL;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use record::Container;
pub use record::ContainerLayout;
pub use record::Record;
pub use record::VariantTag;
pub use summary::CategoryTally;
pub use summary::Summary;
