// crates/testcorpus-cli/src/tests.rs
// ============================================================================
// Module: CLI Library Unit Tests
// Description: Test module index for the CLI library.
// Purpose: Group unit tests for the catalog and output sinks.
// Dependencies: testcorpus-cli library modules.
// ============================================================================

//! ## Overview
//! Unit tests for the CLI library helpers.

mod i18n;
mod output;
