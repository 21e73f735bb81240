// crates/testcorpus-config/src/lib.rs
// ============================================================================
// Module: Test Corpus Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for testcorpus.toml semantics.
// Dependencies: testcorpus-core, serde, toml
// ============================================================================

//! ## Overview
//! `testcorpus-config` defines the configuration model for the corpus tools.
//! It provides strict, fail-closed validation and turns each section into the
//! engine value it configures: reader options, a classifier, a variant
//! layout, and report rules.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
