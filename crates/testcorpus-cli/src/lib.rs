// crates/testcorpus-cli/src/lib.rs
// ============================================================================
// Module: Test Corpus CLI Library
// Description: Shared helpers for the testcorpus command-line interface.
// Purpose: Provide reusable components (i18n, output sinks) for the binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library houses shared CLI utilities: the internationalized message
//! catalog and the output sinks that decide how results reach the terminal.
//! The binary entry point (`src/main.rs`) imports these helpers to keep all
//! user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Output modes and sinks.
pub mod output;

#[cfg(test)]
mod tests;
